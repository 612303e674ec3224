/// Currencies a listing can be priced in.
///
/// Stored as its code (`TL`, `USD`, `EUR`). Anything else is kept verbatim so
/// the price still renders, just without a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Currency {
    Tl,
    Usd,
    Eur,
    Other(String),
}

impl Currency {
    /// Total: unknown codes map to `Other`, never to an error.
    pub fn from_code(code: &str) -> Self {
        match code {
            "TL" => Currency::Tl,
            "USD" => Currency::Usd,
            "EUR" => Currency::Eur,
            other => Currency::Other(other.to_string()),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Tl => "₺",
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Other(_) => "",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::Tl => write!(f, "TL"),
            Currency::Usd => write!(f, "USD"),
            Currency::Eur => write!(f, "EUR"),
            Currency::Other(code) => write!(f, "{}", code),
        }
    }
}

/// Symbol for a raw currency code, `""` for anything unrecognized.
pub fn resolve_symbol(code: &str) -> &'static str {
    Currency::from_code(code).symbol()
}
