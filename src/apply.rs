//! Apply engine: write resolved values into located elements.

use crate::diagnostics::Diagnostics;
use crate::dom::{ElementRef, TranslatableElement, TranslationSpec};
use crate::error::{ErrorCode, Result, TranslatorError};
use crate::i18n::{resolve_with_fallback, LanguageId, Resolution, ResourceStore};
use serde::Serialize;
use tracing::debug;

/// Outcome of one translation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Elements visited.
    pub elements: usize,
    /// Values written, including fallback values.
    pub written: usize,
    /// Keys without a value in the target language.
    pub missing: usize,
    /// Elements with several keys skipped because of an attribute count
    /// mismatch.
    pub rejected: usize,
}

/// Resolves element keys against the store and writes the results.
#[derive(Debug, Clone)]
pub struct ApplyEngine {
    diagnostics: Diagnostics,
}

impl ApplyEngine {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Translate `elements` into `target`, falling back to `default_lang` for
    /// keys the target lacks.
    ///
    /// # Errors
    /// `NoLanguageRegistered` if `target` has no resource; nothing is
    /// written in that case.
    pub fn apply(
        &self,
        store: &ResourceStore,
        target: &LanguageId,
        default_lang: &LanguageId,
        elements: &[ElementRef],
    ) -> Result<ApplyReport> {
        if !store.has(target.as_str()) {
            return Err(TranslatorError::new(
                ErrorCode::NoLanguageRegistered,
                format!("no resource registered for \"{}\"", target),
            ));
        }

        let mut report = ApplyReport {
            elements: elements.len(),
            ..ApplyReport::default()
        };

        for element in elements {
            let Some(spec) = TranslationSpec::from_element(element.as_ref()) else {
                continue;
            };

            if spec.is_mismatched() {
                self.diagnostics.report(
                    ErrorCode::MismatchingAttributes,
                    &format!(
                        "element has {} keys ({}) but {} attributes ({})",
                        spec.keys.len(),
                        spec.keys.join(" "),
                        spec.attributes.len(),
                        spec.attributes.join(" ")
                    ),
                );
            }

            let Some(pairs) = spec.pairs() else {
                report.rejected += 1;
                continue;
            };

            for (key, destination) in pairs {
                let resolution =
                    resolve_with_fallback(store, key, target.as_str(), default_lang.as_str());

                if !resolution.is_found() {
                    report.missing += 1;
                    self.diagnostics.report(
                        ErrorCode::TranslationNotFound,
                        &format!("no translation for \"{}\" in \"{}\"", key, target),
                    );
                }

                match resolution {
                    Resolution::Found(value) | Resolution::Fallback(value) => {
                        element.write(&destination, value);
                        report.written += 1;
                    }
                    Resolution::Missing => {
                        debug!("Leaving {:?} unchanged for key \"{}\"", destination, key);
                    }
                }
            }
        }

        debug!(
            "Applied \"{}\": {} elements, {} written, {} missing, {} rejected",
            target, report.elements, report.written, report.missing, report.rejected
        );

        Ok(report)
    }
}
