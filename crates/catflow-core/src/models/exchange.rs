use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Exchange type declared for the announcement exchange.
///
/// `Fanout` ignores routing keys, `Direct` matches them exactly, and `Topic`
/// matches dot-separated patterns with `*` / `#` wildcards in bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeKind {
    Fanout,
    Direct,
    #[default]
    Topic,
}

impl FromStr for ExchangeKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fanout" => Ok(ExchangeKind::Fanout),
            "direct" => Ok(ExchangeKind::Direct),
            "topic" => Ok(ExchangeKind::Topic),
            _ => Err(anyhow::anyhow!("Invalid exchange type: {}", s)),
        }
    }
}

impl Display for ExchangeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ExchangeKind::Fanout => write!(f, "fanout"),
            ExchangeKind::Direct => write!(f, "direct"),
            ExchangeKind::Topic => write!(f, "topic"),
        }
    }
}
