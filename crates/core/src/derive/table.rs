/// A literal substring substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub from: String,
    pub to: String,
}

impl Rewrite {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Prefix applied when every keyword occurs in the untouched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextTemplate {
    pub keywords: Vec<String>,
    pub label: String,
}

impl ContextTemplate {
    pub fn new(keywords: &[&str], label: impl Into<String>) -> Self {
        Self {
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            label: label.into(),
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().all(|k| text.contains(k.as_str()))
    }
}

/// Ordered rewrite rules consumed by [`super::Transformer`].
///
/// Order matters in every list: later rules see the output of earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RewriteTable {
    /// Unconditional replacements of abbreviations.
    pub abbreviations: Vec<Rewrite>,
    /// Replacements applied only when `to` is not already present.
    pub descriptive: Vec<Rewrite>,
    /// Fallbacks for text no other rule touched. First match wins.
    pub templates: Vec<ContextTemplate>,
}

impl RewriteTable {
    /// The fixed table used for derived cache entries.
    pub fn standard() -> Self {
        let abbreviations = [
            ("m/m", "month over month"),
            ("y/y", "year over year"),
            ("q/q", "quarter over quarter"),
            ("w/w", "week over week"),
            ("Fed", "Federal Reserve"),
            ("ECB", "European Central Bank"),
            ("BoE", "Bank of England"),
            ("BoJ", "Bank of Japan"),
            ("RBA", "Reserve Bank of Australia"),
            ("BOC", "Bank of Canada"),
            ("SNB", "Swiss National Bank"),
            ("RBNZ", "Reserve Bank of New Zealand"),
            ("CPI", "Consumer Price Index"),
            ("PPI", "Producer Price Index"),
            ("GDP", "Gross Domestic Product"),
            ("NFP", "Non-Farm Payrolls"),
            ("ISM", "Institute for Supply Management"),
            ("PMI", "Purchasing Managers Index"),
            ("ADP", "Automatic Data Processing"),
            ("BLS", "Bureau of Labor Statistics"),
            ("BEA", "Bureau of Economic Analysis"),
            ("CBO", "Congressional Budget Office"),
            ("FOMC", "Federal Open Market Committee"),
            ("MPC", "Monetary Policy Committee"),
        ];

        let descriptive = [
            ("Consumer Credit", "Consumer Credit Change"),
            ("Employment", "Employment Data"),
            ("Inflation", "Inflation Rate"),
            ("Interest Rate", "Interest Rate Decision"),
            ("Retail Sales", "Retail Sales Report"),
            ("Trade Balance", "Trade Balance Report"),
            ("Current Account", "Current Account Balance"),
            ("Manufacturing", "Manufacturing Data"),
            ("Services", "Services Sector Data"),
            ("Housing", "Housing Market Data"),
            ("Consumer", "Consumer Data"),
            ("Business", "Business Activity Data"),
        ];

        Self {
            abbreviations: abbreviations
                .iter()
                .map(|(from, to)| Rewrite::new(*from, *to))
                .collect(),
            descriptive: descriptive
                .iter()
                .map(|(from, to)| Rewrite::new(*from, *to))
                .collect(),
            templates: vec![
                ContextTemplate::new(&["Change", "Employment"], "Employment Change Report"),
                ContextTemplate::new(&["Rate", "Interest"], "Interest Rate Decision"),
                ContextTemplate::new(&["Sales", "Retail"], "Retail Sales Performance"),
                ContextTemplate::new(&["Balance", "Trade"], "Trade Balance Report"),
            ],
        }
    }
}
