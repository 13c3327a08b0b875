use std::collections::HashSet;

/// Spreadsheet hard limit on sheet-name length, in characters
pub const MAX_SHEET_NAME_CHARS: usize = 31;

const FORBIDDEN: [char; 7] = ['\\', '/', '*', '?', ':', '[', ']'];

/// Not allowed as the first or last character of a sheet name
const APOSTROPHE: char = '\'';

/// Prefix kept on deduplicated names while the suffix fits in 3 characters
const DEDUP_BASE_CHARS: usize = 28;

/// Strip forbidden characters, cut to the length limit and drop
/// apostrophes from both ends. Never returns an empty name.
pub fn clean_sheet_name(raw: &str) -> String {
    let cut: String = raw
        .chars()
        .filter(|c| !FORBIDDEN.contains(c))
        .take(MAX_SHEET_NAME_CHARS)
        .collect();
    let cleaned = cut.trim_matches(APOSTROPHE);

    if cleaned.trim().is_empty() {
        "Sheet".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Hands out unique sheet names within one workbook.
///
/// Comparison is case-insensitive, like the spreadsheet application.
#[derive(Debug, Clone, Default)]
pub struct SheetNamer {
    taken: HashSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(&name.to_lowercase())
    }

    /// Clean `raw` and, on collision, append the occurrence number
    /// (`_2`, `_3`, ...) to a 28-character prefix until the name is free.
    pub fn claim(&mut self, raw: &str) -> String {
        let cleaned = clean_sheet_name(raw);

        let name = if self.is_taken(&cleaned) {
            let mut counter = 2usize;
            loop {
                let suffix = format!("_{}", counter);
                let keep = DEDUP_BASE_CHARS.min(MAX_SHEET_NAME_CHARS - suffix.len());
                let base: String = cleaned.chars().take(keep).collect();
                let candidate = format!("{}{}", base, suffix);
                if !self.is_taken(&candidate) {
                    break candidate;
                }
                counter += 1;
            }
        } else {
            cleaned
        };

        self.taken.insert(name.to_lowercase());
        name
    }
}
