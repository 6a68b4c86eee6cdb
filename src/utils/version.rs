// src/utils/version.rs

use std::cmp::Ordering;

/// Compares two dotted version strings segment by segment, treating missing
/// trailing segments as zero ("1.2" == "1.2.0"). Versions containing a
/// non-numeric segment fall back to plain lexical ordering; full SemVer
/// validation is out of scope.
pub fn compare(a: &str, b: &str) -> Ordering {
	match (numeric_segments(a), numeric_segments(b)) {
		(Some(left), Some(right)) => {
			let len = left.len().max(right.len());
			for i in 0..len {
				let l = left.get(i).copied().unwrap_or(0);
				let r = right.get(i).copied().unwrap_or(0);
				match l.cmp(&r) {
					Ordering::Equal => continue,
					other => return other,
				}
			}
			Ordering::Equal
		}
		_ => a.cmp(b),
	}
}

fn numeric_segments(version: &str) -> Option<Vec<u64>> {
	version
		.trim()
		.split('.')
		.map(|segment| segment.parse::<u64>().ok())
		.collect()
}
