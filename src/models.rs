use serde::Serialize;

/// One marketplace listing, rebuilt from the upstream API on every request.
/// Either fully usable or dropped during construction; never mutated after.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub name: String,
    pub price: f64,
    pub original_price: Option<f64>,
    pub link: String,
    pub sold_count: u64,
    pub coupon: Option<String>,
    pub item_id: String,
    pub shipping_is_free: bool,
    pub score: u64,
}

impl Product {
    /// Placeholder title for listings the API returns without one.
    pub fn fallback_name(item_id: &str) -> String {
        format!("Produto {item_id}")
    }
}

/// Daily posting window. Parsing happens at the HTTP boundary so the
/// selector and formatter never see an unrecognized shift name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shift {
    Manha,
    Tarde,
    Noite,
}

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::Manha, Shift::Tarde, Shift::Noite];

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "manha" => Some(Shift::Manha),
            "tarde" => Some(Shift::Tarde),
            "noite" => Some(Shift::Noite),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Manha => "manha",
            Shift::Tarde => "tarde",
            Shift::Noite => "noite",
        }
    }

    /// Fixed 3-item window into the candidate list, one per shift.
    pub fn window(&self) -> std::ops::Range<usize> {
        match self {
            Shift::Manha => 0..3,
            Shift::Tarde => 3..6,
            Shift::Noite => 6..9,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Shift::Manha => "Pacote das 6h",
            Shift::Tarde => "Pacote das 12h",
            Shift::Noite => "Pacote das 19h",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_parse_is_case_insensitive() {
        assert_eq!(Shift::parse("MANHA"), Some(Shift::Manha));
        assert_eq!(Shift::parse(" tarde "), Some(Shift::Tarde));
        assert_eq!(Shift::parse("noite"), Some(Shift::Noite));
        assert_eq!(Shift::parse("madrugada"), None);
    }

    #[test]
    fn shift_windows_cover_nine_slots_without_overlap() {
        let mut seen = Vec::new();
        for shift in Shift::ALL {
            seen.extend(shift.window());
        }
        assert_eq!(seen, (0..9).collect::<Vec<_>>());
    }
}
