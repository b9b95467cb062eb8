// ABOUTME: Condition grammar for gating task execution
// ABOUTME: Parses resolved condition text into equality, inequality, or truthiness checks

/// A parsed task condition.
///
/// The grammar is deliberately small. `==` is looked for before `!=`, so a
/// text containing both operators is always an equality check with the
/// remainder (including any `!=`) on the right-hand side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Equals { left: String, right: String },
    NotEquals { left: String, right: String },
    Truthy(String),
}

fn operand(text: &str) -> String {
    text.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}

impl Condition {
    /// Parse condition text whose placeholders have already been resolved
    pub fn parse(text: &str) -> Self {
        if let Some((left, right)) = text.split_once("==") {
            return Condition::Equals {
                left: left.trim().to_string(),
                right: operand(right),
            };
        }

        if let Some((left, right)) = text.split_once("!=") {
            return Condition::NotEquals {
                left: left.trim().to_string(),
                right: operand(right),
            };
        }

        Condition::Truthy(text.to_string())
    }

    pub fn evaluate(&self) -> bool {
        match self {
            Condition::Equals { left, right } => left == right,
            Condition::NotEquals { left, right } => left != right,
            Condition::Truthy(value) => !matches!(value.as_str(), "" | "false" | "0"),
        }
    }
}
