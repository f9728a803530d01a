//! Applying proposed replacements to source text.

use crate::types::Replacement;

/// Errors raised when a replacement cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// The replacement range extends past the end of the source.
    #[error("replacement {start}..{end} is out of bounds for source of length {len}")]
    OutOfBounds {
        /// Start offset.
        start: usize,
        /// End offset.
        end: usize,
        /// Source length in bytes.
        len: usize,
    },
    /// The replacement range splits a multi-byte character.
    #[error("replacement {start}..{end} does not fall on a character boundary")]
    CharBoundary {
        /// Start offset.
        start: usize,
        /// End offset.
        end: usize,
    },
}

/// Outcome of [`apply_replacements`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Rewritten source text.
    pub text: String,
    /// Number of replacements applied.
    pub applied: usize,
    /// Number of replacements skipped because they overlap an applied one.
    pub skipped: usize,
}

/// Applies byte-range replacements to `source`.
///
/// Replacements are applied from the end of the file towards the start so
/// earlier offsets stay valid. When two replacements overlap, the one that
/// starts later wins and the other is skipped.
///
/// # Errors
///
/// Returns an error if a range lies outside `source` or splits a character.
pub fn apply_replacements(
    source: &str,
    replacements: &[Replacement],
) -> Result<EditOutcome, EditError> {
    for r in replacements {
        let range = r.location.byte_range();
        if range.end > source.len() {
            return Err(EditError::OutOfBounds {
                start: range.start,
                end: range.end,
                len: source.len(),
            });
        }
        if !source.is_char_boundary(range.start) || !source.is_char_boundary(range.end) {
            return Err(EditError::CharBoundary {
                start: range.start,
                end: range.end,
            });
        }
    }

    let mut ordered: Vec<&Replacement> = replacements.iter().collect();
    ordered.sort_by(|a, b| {
        b.location
            .offset
            .cmp(&a.location.offset)
            .then(b.location.length.cmp(&a.location.length))
    });

    let mut text = source.to_owned();
    let mut applied = 0;
    let mut skipped = 0;
    let mut floor = usize::MAX;

    for r in ordered {
        let range = r.location.byte_range();
        if range.end > floor {
            tracing::debug!(
                "Skipping overlapping replacement at {}..{}",
                range.start,
                range.end
            );
            skipped += 1;
            continue;
        }
        text.replace_range(range.clone(), &r.new_text);
        floor = range.start;
        applied += 1;
    }

    Ok(EditOutcome {
        text,
        applied,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;
    use std::path::PathBuf;

    fn replace(offset: usize, length: usize, text: &str) -> Replacement {
        Replacement::new(
            Location::new(PathBuf::from("a.js"), 1, 1).with_span(offset, length),
            text,
        )
    }

    #[test]
    fn applies_single_replacement() {
        let src = "import map from 'lodash';\nmap([]);\n";
        let out = apply_replacements(src, &[replace(0, 25, "import map from 'lodash-es';")])
            .unwrap();
        assert_eq!(out.text, "import map from 'lodash-es';\nmap([]);\n");
        assert_eq!(out.applied, 1);
        assert_eq!(out.skipped, 0);
    }

    #[test]
    fn applies_multiple_in_any_order() {
        let src = "import a from 'x';\nimport b from 'y';\n";
        let out = apply_replacements(
            src,
            &[
                replace(0, 18, "import a from 'xx';"),
                replace(19, 18, "import b from 'yy';"),
            ],
        )
        .unwrap();
        assert_eq!(out.text, "import a from 'xx';\nimport b from 'yy';\n");
        assert_eq!(out.applied, 2);
    }

    #[test]
    fn skips_overlapping_replacement() {
        let src = "abcdefgh";
        let out = apply_replacements(src, &[replace(0, 4, "X"), replace(2, 4, "Y")]).unwrap();
        assert_eq!(out.text, "abYgh");
        assert_eq!(out.applied, 1);
        assert_eq!(out.skipped, 1);
    }

    #[test]
    fn no_replacements_is_identity() {
        let out = apply_replacements("const a = 1;", &[]).unwrap();
        assert_eq!(out.text, "const a = 1;");
        assert_eq!(out.applied, 0);
    }

    #[test]
    fn rejects_out_of_bounds() {
        let err = apply_replacements("abc", &[replace(2, 5, "x")]).unwrap_err();
        assert_eq!(
            err,
            EditError::OutOfBounds {
                start: 2,
                end: 7,
                len: 3
            }
        );
    }

    #[test]
    fn rejects_split_character() {
        let err = apply_replacements("é", &[replace(1, 1, "e")]).unwrap_err();
        assert!(matches!(err, EditError::CharBoundary { .. }));
    }
}
