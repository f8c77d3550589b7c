use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorAttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    StartsWith { key: String, value: String },
    EndsWith { key: String, value: String },
    Contains { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorPseudoClass {
    FirstChild,
    LastChild,
    Disabled,
    Enabled,
    Required,
    Not(Vec<Vec<SelectorPart>>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) universal: bool,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<SelectorAttrCondition>,
    pub(crate) pseudo_classes: Vec<SelectorPseudoClass>,
}

impl SelectorStep {
    pub(crate) fn id_only(&self) -> Option<&str> {
        if !self.universal
            && self.tag.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.pseudo_classes.is_empty()
        {
            self.id.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectorCombinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) step: SelectorStep,
    // Relation to previous (left) selector part.
    pub(crate) combinator: Option<SelectorCombinator>,
}

pub(crate) fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorPart>> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let tokens = tokenize_selector(selector)?;
    let mut steps = Vec::new();
    let mut pending_combinator: Option<SelectorCombinator> = None;

    for token in tokens {
        if token == ">" {
            if pending_combinator.is_some() || steps.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            pending_combinator = Some(SelectorCombinator::Child);
            continue;
        }
        if token == "+" || token == "~" {
            return Err(Error::UnsupportedSelector(selector.into()));
        }

        let step = parse_selector_step(&token)?;
        let combinator = if steps.is_empty() {
            None
        } else {
            Some(
                pending_combinator
                    .take()
                    .unwrap_or(SelectorCombinator::Descendant),
            )
        };
        steps.push(SelectorPart { step, combinator });
    }

    if steps.is_empty() || pending_combinator.is_some() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    Ok(steps)
}

pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    let groups = split_selector_groups(selector)?;
    let mut parsed = Vec::with_capacity(groups.len());
    for group in groups {
        parsed.push(parse_selector_chain(&group)?);
    }
    Ok(parsed)
}

fn split_selector_groups(selector: &str) -> Result<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut depth = NestingDepth::default();

    for ch in selector.chars() {
        depth.track(ch, selector)?;
        if ch == ',' && depth.is_top_level() {
            let trimmed = current.trim();
            if trimmed.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            groups.push(trimmed.to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }

    depth.finish(selector)?;

    let trimmed = current.trim();
    if trimmed.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    groups.push(trimmed.to_string());
    Ok(groups)
}

fn tokenize_selector(selector: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = NestingDepth::default();

    for ch in selector.chars() {
        depth.track(ch, selector)?;
        match ch {
            '>' | '+' | '~' if depth.is_top_level() => {
                if !current.trim().is_empty() {
                    tokens.push(current.trim().to_string());
                }
                current.clear();
                tokens.push(ch.to_string());
            }
            ch if ch.is_ascii_whitespace() && depth.is_top_level() => {
                if !current.trim().is_empty() {
                    tokens.push(current.trim().to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    depth.finish(selector)?;

    if !current.trim().is_empty() {
        tokens.push(current.trim().to_string());
    }

    Ok(tokens)
}

/// Bracket/paren/quote tracking shared by the group splitter and tokenizer.
#[derive(Debug, Default)]
struct NestingDepth {
    bracket: usize,
    paren: usize,
    quote: Option<char>,
}

impl NestingDepth {
    fn track(&mut self, ch: char, selector: &str) -> Result<()> {
        if let Some(q) = self.quote {
            if ch == q {
                self.quote = None;
            }
            return Ok(());
        }
        match ch {
            '"' | '\'' if self.bracket > 0 => self.quote = Some(ch),
            '[' => self.bracket += 1,
            ']' => {
                self.bracket = self
                    .bracket
                    .checked_sub(1)
                    .ok_or_else(|| Error::UnsupportedSelector(selector.into()))?;
            }
            '(' => self.paren += 1,
            ')' => {
                self.paren = self
                    .paren
                    .checked_sub(1)
                    .ok_or_else(|| Error::UnsupportedSelector(selector.into()))?;
            }
            _ => {}
        }
        Ok(())
    }

    fn is_top_level(&self) -> bool {
        self.bracket == 0 && self.paren == 0 && self.quote.is_none()
    }

    fn finish(&self, selector: &str) -> Result<()> {
        if self.bracket != 0 || self.paren != 0 || self.quote.is_some() {
            return Err(Error::UnsupportedSelector(selector.into()));
        }
        Ok(())
    }
}

fn parse_selector_step(part: &str) -> Result<SelectorStep> {
    let part = part.trim();
    if part.is_empty() {
        return Err(Error::UnsupportedSelector(part.into()));
    }

    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = SelectorStep::default();

    while i < bytes.len() {
        match bytes[i] {
            b'*' => {
                if step.universal || step.tag.is_some() {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                step.universal = true;
                i += 1;
            }
            b'#' => {
                i += 1;
                let Some((id, next)) = parse_selector_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                if step.id.replace(id).is_some() {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                i = next;
            }
            b'.' => {
                i += 1;
                let Some((class_name, next)) = parse_selector_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.classes.push(class_name);
                i = next;
            }
            b'[' => {
                let (attr, next) = parse_selector_attr_condition(part, i)?;
                step.attrs.push(attr);
                i = next;
            }
            b':' => {
                let (pseudo, next) = parse_selector_pseudo(part, i)?;
                step.pseudo_classes.push(pseudo);
                i = next;
            }
            _ => {
                if step.tag.is_some()
                    || step.id.is_some()
                    || !step.classes.is_empty()
                    || !step.attrs.is_empty()
                    || step.universal
                {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                let Some((tag, next)) = parse_selector_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }

    Ok(step)
}

fn parse_selector_pseudo(part: &str, start: usize) -> Result<(SelectorPseudoClass, usize)> {
    let Some((name, next)) = parse_selector_ident(part, start + 1) else {
        return Err(Error::UnsupportedSelector(part.into()));
    };

    let simple = match name.as_str() {
        "first-child" => Some(SelectorPseudoClass::FirstChild),
        "last-child" => Some(SelectorPseudoClass::LastChild),
        "disabled" => Some(SelectorPseudoClass::Disabled),
        "enabled" => Some(SelectorPseudoClass::Enabled),
        "required" => Some(SelectorPseudoClass::Required),
        _ => None,
    };
    if let Some(pseudo) = simple {
        return Ok((pseudo, next));
    }

    if name != "not" || part.as_bytes().get(next) != Some(&b'(') {
        return Err(Error::UnsupportedSelector(part.into()));
    }
    let close = find_matching_paren(part, next)
        .ok_or_else(|| Error::UnsupportedSelector(part.into()))?;
    let inner = part
        .get(next + 1..close)
        .ok_or_else(|| Error::UnsupportedSelector(part.into()))?;
    let groups = parse_selector_groups(inner)?;
    Ok((SelectorPseudoClass::Not(groups), close + 1))
}

fn find_matching_paren(src: &str, open: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    for (idx, b) in bytes.iter().enumerate().skip(open) {
        if let Some(q) = quote {
            if *b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'\'' | b'"' => quote = Some(*b),
            b'(' => depth += 1,
            b')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_selector_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    if start >= bytes.len() || !is_selector_ident_char(bytes[start]) {
        return None;
    }
    let mut end = start + 1;
    while end < bytes.len() && is_selector_ident_char(bytes[end]) {
        end += 1;
    }
    Some((src.get(start..end)?.to_string(), end))
}

fn is_selector_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn parse_selector_attr_condition(
    src: &str,
    open_bracket: usize,
) -> Result<(SelectorAttrCondition, usize)> {
    let bytes = src.as_bytes();
    let mut i = open_bracket + 1;
    let mut quote: Option<u8> = None;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i = (i + 2).min(bytes.len());
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        if b == b'\'' || b == b'"' {
            quote = Some(b);
            i += 1;
            continue;
        }

        if b == b']' {
            let Some(body) = src.get(open_bracket + 1..i) else {
                return Err(Error::UnsupportedSelector(src.into()));
            };
            let cond = parse_attr_condition_body(body.trim(), src)?;
            return Ok((cond, i + 1));
        }

        i += 1;
    }

    Err(Error::UnsupportedSelector(src.into()))
}

fn parse_attr_condition_body(body: &str, src: &str) -> Result<SelectorAttrCondition> {
    if body.is_empty() {
        return Err(Error::UnsupportedSelector(src.into()));
    }
    let Some((raw_key, value)) = body.split_once('=') else {
        return Ok(SelectorAttrCondition::Exists {
            key: body.to_ascii_lowercase(),
        });
    };

    let (key, operator) = match raw_key.trim_end().char_indices().last() {
        Some((idx, op @ ('^' | '$' | '*'))) => (&raw_key[..idx], Some(op)),
        _ => (raw_key, None),
    };
    let key = key.trim().to_ascii_lowercase();
    if key.is_empty() {
        return Err(Error::UnsupportedSelector(src.into()));
    }

    let value = value.trim();
    let value = if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    };

    Ok(match operator {
        Some('^') => SelectorAttrCondition::StartsWith { key, value },
        Some('$') => SelectorAttrCondition::EndsWith { key, value },
        Some('*') => SelectorAttrCondition::Contains { key, value },
        _ => SelectorAttrCondition::Eq { key, value },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compound_step_with_attribute_prefix() -> Result<()> {
        let chain = parse_selector_chain("a[href^=\"#\"]")?;
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].step.tag.as_deref(), Some("a"));
        assert_eq!(
            chain[0].step.attrs,
            vec![SelectorAttrCondition::StartsWith {
                key: "href".into(),
                value: "#".into()
            }]
        );
        Ok(())
    }

    #[test]
    fn groups_split_outside_brackets_only() -> Result<()> {
        let groups = parse_selector_groups("input, [data-x=\"a,b\"], textarea")?;
        assert_eq!(groups.len(), 3);
        Ok(())
    }

    #[test]
    fn child_combinator_is_recorded() -> Result<()> {
        let chain = parse_selector_chain(".nav > .nav__menu")?;
        assert_eq!(chain[1].combinator, Some(SelectorCombinator::Child));
        Ok(())
    }

    #[test]
    fn not_pseudo_class_nests_groups() -> Result<()> {
        let chain = parse_selector_chain("[tabindex]:not([tabindex=\"-1\"])")?;
        match &chain[0].step.pseudo_classes[..] {
            [SelectorPseudoClass::Not(groups)] => assert_eq!(groups.len(), 1),
            other => panic!("unexpected pseudo classes: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn structural_state_and_substring_selectors_match() -> Result<()> {
        let dom = crate::html::parse_html(
            r#"<ul>
                 <li data-k="foo-bar">a</li>
                 <li data-k="bar">b</li>
                 <li data-k="baz">c</li>
               </ul>
               <form>
                 <input id="name" required>
                 <input id="coupon" disabled>
               </form>"#,
        )?;
        let count = |selector: &str| -> Result<usize> {
            Ok(dom.query_selector_all(selector)?.len())
        };
        assert_eq!(count("li:first-child")?, 1);
        assert_eq!(count("li:last-child")?, 1);
        assert_eq!(count("[data-k$=bar]")?, 2);
        assert_eq!(count("[data-k*=o-b]")?, 1);
        assert_eq!(count("input:required")?, 1);
        assert_eq!(count("input:enabled")?, 1);
        assert_eq!(count("input:disabled")?, 1);
        Ok(())
    }

    #[test]
    fn sibling_combinators_are_rejected() {
        assert!(matches!(
            parse_selector_chain("a + b"),
            Err(Error::UnsupportedSelector(_))
        ));
        assert!(matches!(
            parse_selector_groups("a,,b"),
            Err(Error::UnsupportedSelector(_))
        ));
        assert!(parse_selector_chain("div[").is_err());
    }
}
