use crate::domain::model::{ChainMap, MultisigConfig, ValidatorInfo};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static STRING_CONST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*(?:export\s+)?const\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?::\s*[A-Za-z_]+\s*)?=\s*('(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*")\s*;"#)
        .expect("valid string const pattern")
});

static OBJECT_CONST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:export\s+)?const\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?::\s*[A-Za-z_<>]+\s*)?=\s*\{")
        .expect("valid object const pattern")
});

static CONFIG_MAP_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"defaultMultisigConfigs[^=]*=\s*\{").expect("valid config map pattern")
});

// 每種引號只在同一種引號結束
static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)^(?:'(?P<s>(?:[^'\\]|\\.)*)'|"(?P<d>(?:[^"\\]|\\.)*)"|`(?P<b>[^`]*)`)$"#)
        .expect("valid string literal pattern")
});

/// Parses the multisig ISM source file into per-chain validator sets.
///
/// Only the `defaultMultisigConfigs` map is read. Aliases and validators
/// given by constant name are resolved against `const` declarations in the
/// same file; unknown alias names are kept as written. Text that does not
/// contain the map yields an empty result.
pub fn parse_validators(source: &str) -> ChainMap<MultisigConfig> {
    let source = strip_comments(source);
    let aliases = string_constants(&source);
    let validator_consts = validator_constants(&source, &aliases);

    let mut configs = ChainMap::new();
    let Some(start) = CONFIG_MAP_START.find(&source) else {
        tracing::debug!("No defaultMultisigConfigs map found in validators file");
        return configs;
    };

    let body = &source[start.end()..];
    let body = matching_close(body).map_or(body, |end| &body[..end]);

    for entry in split_top_level(body) {
        // `...otherConfigs` 之類的展開略過
        let Some((chain, value)) = split_field(entry) else {
            continue;
        };
        let Some(block) = enclosed(value, '{', '}') else {
            continue;
        };
        configs.insert(
            chain,
            parse_multisig_block(block, &aliases, &validator_consts),
        );
    }

    configs
}

fn parse_multisig_block(
    block: &str,
    aliases: &HashMap<String, String>,
    validator_consts: &HashMap<String, ValidatorInfo>,
) -> MultisigConfig {
    let mut config = MultisigConfig::default();

    for field in split_top_level(block) {
        match split_field(field) {
            Some((key, value)) if key == "threshold" => config.threshold = value.parse().ok(),
            Some((key, value)) if key == "validators" => {
                if let Some(items) = enclosed(value, '[', ']') {
                    config.validators = split_top_level(items)
                        .into_iter()
                        .filter_map(|item| parse_validator_item(item, aliases, validator_consts))
                        .collect();
                }
            }
            _ => {}
        }
    }

    config
}

fn parse_validator_item(
    item: &str,
    aliases: &HashMap<String, String>,
    validator_consts: &HashMap<String, ValidatorInfo>,
) -> Option<ValidatorInfo> {
    if let Some(body) = enclosed(item, '{', '}') {
        return parse_validator_object(body, aliases);
    }
    if let Some(address) = string_literal(item) {
        return Some(ValidatorInfo {
            address,
            alias: None,
        });
    }
    // `...SPREAD` 之類的無法解析，略過
    validator_consts.get(item).cloned()
}

fn parse_validator_object(body: &str, aliases: &HashMap<String, String>) -> Option<ValidatorInfo> {
    let mut address = None;
    let mut alias = None;

    for field in split_top_level(body) {
        match split_field(field) {
            Some((key, value)) if key == "address" => address = string_literal(value),
            Some((key, value)) if key == "alias" => {
                alias = Some(string_literal(value).unwrap_or_else(|| {
                    aliases
                        .get(value)
                        .cloned()
                        .unwrap_or_else(|| value.to_string())
                }));
            }
            _ => {}
        }
    }

    Some(ValidatorInfo {
        address: address?,
        alias,
    })
}

fn string_constants(source: &str) -> HashMap<String, String> {
    STRING_CONST
        .captures_iter(source)
        .filter_map(|caps| Some((caps[1].to_string(), string_literal(&caps[2])?)))
        .collect()
}

fn validator_constants(
    source: &str,
    aliases: &HashMap<String, String>,
) -> HashMap<String, ValidatorInfo> {
    OBJECT_CONST
        .captures_iter(source)
        .filter_map(|caps| {
            let rest = &source[caps.get(0)?.end()..];
            let body = &rest[..matching_close(rest)?];
            let validator = parse_validator_object(body, aliases)?;
            Some((caps[1].to_string(), validator))
        })
        .collect()
}

/// The text of a whole quoted literal, with escapes resolved.
fn string_literal(text: &str) -> Option<String> {
    let caps = STRING_LITERAL.captures(text.trim())?;
    let raw = caps
        .name("s")
        .or_else(|| caps.name("d"))
        .or_else(|| caps.name("b"))?
        .as_str();
    Some(unescape(raw))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// `text` without its outer `open`/`close` pair, if it has one.
fn enclosed(text: &str, open: char, close: char) -> Option<&str> {
    text.trim().strip_prefix(open)?.strip_suffix(close)
}

/// Yields `(byte index, char)` for every character outside string literals.
fn code_chars(text: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    text.char_indices().filter(move |&(_, c)| {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            return false;
        }
        if matches!(c, '\'' | '"' | '`') {
            quote = Some(c);
            return false;
        }
        true
    })
}

/// Index of the bracket closing the one just before `text`.
fn matching_close(text: &str) -> Option<usize> {
    let mut depth = 0usize;

    for (i, c) in code_chars(text) {
        match c {
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' if depth == 0 => return Some(i),
            '}' | ']' | ')' => depth -= 1,
            _ => {}
        }
    }

    None
}

/// Splits on commas that sit outside brackets and string literals.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in code_chars(text) {
        match c {
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());

    parts.retain(|part| !part.is_empty());
    parts
}

/// Splits `key: value` at the first colon outside string literals.
fn split_field(entry: &str) -> Option<(String, &str)> {
    let (i, _) = code_chars(entry).find(|&(_, c)| c == ':')?;
    let key = clean_key(&entry[..i]);
    if key.is_empty() {
        return None;
    }
    Some((key, entry[i + 1..].trim()))
}

fn clean_key(raw: &str) -> String {
    let raw = raw.trim();
    string_literal(raw).unwrap_or_else(|| raw.to_string())
}

/// Removes `//` and `/* */` comments outside string literals.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match (c, chars.peek()) {
            ('/', Some(&'/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some(&'*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            ('\'' | '"' | '`', _) => {
                quote = Some(c);
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out
}
