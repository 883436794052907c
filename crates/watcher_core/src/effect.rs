#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver `text` to the configured recipient.
    Notify { text: String },
}
