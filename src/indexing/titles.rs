//! De-duplication of AI titles.

use std::collections::{HashMap, HashSet};

use crate::backend::AnalysisResult;

/// Split `"Panel 3"` into `("Panel", 3)`. Names without a numeric suffix count as 1.
fn split_suffix(name: &str) -> (&str, usize) {
    if let Some((base, suffix)) = name.rsplit_once(char::is_whitespace) {
        if !base.is_empty() && !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(n) = suffix.parse() {
                return (base, n);
            }
        }
    }
    (name, 1)
}

/// Make AI titles unique across the batch and the titles already in the document.
///
/// The first occurrence of a new plain title is kept as is; repeats get ` 2`,
/// ` 3`, ... continuing after the highest suffix already in use for that base.
/// A title that already carries a suffix is kept if free. Results without a
/// title pass through untouched.
pub fn ensure_unique_titles(results: Vec<AnalysisResult>, existing: &[&str]) -> Vec<AnalysisResult> {
    let mut highest: HashMap<String, usize> = HashMap::new();
    let mut taken: HashSet<String> = HashSet::new();
    for name in existing {
        let name = name.trim();
        let (base, n) = split_suffix(name);
        let entry = highest.entry(base.to_string()).or_insert(n);
        *entry = (*entry).max(n);
        taken.insert(name.to_string());
    }

    results
        .into_iter()
        .map(|mut result| {
            let Some(original) = result.suggested_title().map(str::to_string) else {
                return result;
            };
            let (base, n) = split_suffix(&original);
            let base = base.to_string();

            let keep = if n == 1 {
                !highest.contains_key(&base)
            } else {
                !taken.contains(&original)
            };
            let (unique, used) = if keep {
                (original.clone(), n)
            } else {
                let mut next = highest.get(&base).copied().unwrap_or(1) + 1;
                while taken.contains(&format!("{base} {next}")) {
                    next += 1;
                }
                (format!("{base} {next}"), next)
            };

            let entry = highest.entry(base).or_insert(used);
            *entry = (*entry).max(used);
            taken.insert(unique.clone());

            if unique != original {
                log::info!("📝 Title '{}' -> '{}'", original, unique);
            }
            result.suggested_name = Some(unique);
            result.title = None;
            result
        })
        .collect()
}
