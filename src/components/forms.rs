use fancy_regex::Regex;

use super::Handler;
use super::notify::{self, NotificationKind};
use crate::events::EventState;
use crate::page::Host;
use crate::{Error, NodeId, Result};

const ERROR_CLASS: &str = "form__input--error";
const MISSING_MESSAGE: &str = "Please fill in all required fields.";
const MISMATCH_MESSAGE: &str = "Please check the highlighted fields.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormHandler {
    Submit(usize),
    FieldBlur(usize),
    FieldInput,
}

#[derive(Debug)]
struct FieldPattern {
    field: NodeId,
    regex: Regex,
}

#[derive(Debug)]
struct FormRules {
    form: NodeId,
    patterns: Vec<FieldPattern>,
}

impl FormRules {
    fn pattern_for(&self, field: NodeId) -> Option<&Regex> {
        self.patterns
            .iter()
            .find(|pattern| pattern.field == field)
            .map(|pattern| &pattern.regex)
    }
}

#[derive(Debug, Default)]
pub(crate) struct FormValidators {
    forms: Vec<FormRules>,
}

pub(crate) fn install(host: &mut Host, validators: &mut FormValidators) -> Result<()> {
    for form in host.dom.query_selector_all("form")? {
        let index = validators.forms.len();
        let mut patterns = Vec::new();
        for field in host
            .dom
            .query_selector_all_from(form, "input, textarea, select")?
        {
            if let Some(pattern) = host.dom.attr(field, "pattern") {
                patterns.push(FieldPattern {
                    field,
                    regex: compile_pattern(&pattern)?,
                });
            }
            host.listen(field, "blur", Handler::Form(FormHandler::FieldBlur(index)));
            host.listen(field, "input", Handler::Form(FormHandler::FieldInput));
        }
        host.listen(form, "submit", Handler::Form(FormHandler::Submit(index)));
        validators.forms.push(FormRules { form, patterns });
    }
    Ok(())
}

/// Compiles an HTML `pattern` attribute, which must match the whole value.
fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|err| Error::Pattern {
        pattern: pattern.to_string(),
        message: err.to_string(),
    })
}

fn is_blank(host: &Host, field: NodeId) -> Result<bool> {
    Ok(host.dom.value(field)?.trim().is_empty())
}

fn pattern_mismatch(host: &Host, rules: &FormRules, field: NodeId) -> Result<bool> {
    let Some(regex) = rules.pattern_for(field) else {
        return Ok(false);
    };
    let value = host.dom.value(field)?;
    if value.is_empty() {
        return Ok(false);
    }
    // A match that exhausts the backtracking budget counts as a mismatch.
    Ok(!regex.is_match(&value).unwrap_or(false))
}

fn mark(host: &mut Host, field: NodeId, invalid: bool) -> Result<()> {
    if invalid {
        host.dom.class_add(field, ERROR_CLASS)
    } else {
        host.dom.class_remove(field, ERROR_CLASS)
    }
}

pub(crate) fn handle(
    host: &mut Host,
    validators: &FormValidators,
    handler: FormHandler,
    event: &mut EventState,
) -> Result<()> {
    match handler {
        FormHandler::Submit(index) => {
            let Some(rules) = validators.forms.get(index) else {
                return Ok(());
            };
            let mut missing = false;
            for field in host.dom.query_selector_all_from(rules.form, "[required]")? {
                let blank = is_blank(host, field)?;
                missing |= blank;
                mark(host, field, blank)?;
            }
            let mut mismatched = false;
            for pattern in &rules.patterns {
                if pattern_mismatch(host, rules, pattern.field)? {
                    mismatched = true;
                    mark(host, pattern.field, true)?;
                }
            }
            if !missing && !mismatched {
                return Ok(());
            }
            event.prevent_default();
            let message = if missing {
                MISSING_MESSAGE
            } else {
                MISMATCH_MESSAGE
            };
            tracing::info!(missing, mismatched, "form submission blocked");
            notify::show(host, message, NotificationKind::Error)?;
            Ok(())
        }
        FormHandler::FieldBlur(index) => {
            let field = event.current_target;
            let blank_required = host.dom.required(field) && is_blank(host, field)?;
            let mismatched = match validators.forms.get(index) {
                Some(rules) => pattern_mismatch(host, rules, field)?,
                None => false,
            };
            mark(host, field, blank_required || mismatched)
        }
        FormHandler::FieldInput => {
            let field = event.current_target;
            if host.dom.class_contains(field, ERROR_CLASS) && !is_blank(host, field)? {
                host.dom.class_remove(field, ERROR_CLASS)?;
            }
            Ok(())
        }
    }
}
