//! Detection and extraction of tool directives in model output.
//!
//! The model requests a tool by embedding `[USAR_TOOL:nombre ...]` in its
//! otherwise free-form answer. The grammar is deliberately forgiving:
//! anything that does not parse is treated as plain text, never as an
//! error, because the model's output is untrusted.

use crate::value::{Params, Value, coerce};

/// Token that opens a tool directive.
pub const OPEN_TOKEN: &str = "[USAR_TOOL:";

const CLOSE_TOKEN: char = ']';

/// A tool invocation requested by the model, parsed from its response.
///
/// Transient: created per model response and discarded after dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveCall {
    pub raw_name: String,
    pub params: Params,
}

/// Scan model text for a tool directive.
///
/// The directive body is whitespace-tokenized: the first token names the
/// tool, `key=value` tokens become coerced parameters (values may be
/// single- or double-quoted), and bare tokens become `true` flags. Only
/// the first directive in the text is honored; an unterminated directive
/// or an empty body yields `None`.
pub fn parse_directive(text: &str) -> Option<DirectiveCall> {
    let start = text.find(OPEN_TOKEN)? + OPEN_TOKEN.len();
    let end = start + text[start..].find(CLOSE_TOKEN)?;
    let body = &text[start..end];

    let mut tokens = body.split_whitespace();
    let raw_name = tokens.next()?.to_string();

    let mut params = Params::new();
    for token in tokens {
        match token.split_once('=') {
            Some((key, value)) => {
                params.insert(key.to_string(), coerce(strip_quotes(value)));
            }
            None => {
                params.insert(token.to_string(), Value::Bool(true));
            }
        }
    }

    Some(DirectiveCall { raw_name, params })
}

fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_open_token_has_no_directive() {
        assert_eq!(parse_directive("Hola, ¿en qué puedo ayudarte?"), None);
        assert_eq!(parse_directive(""), None);
        assert_eq!(parse_directive("USAR_TOOL:buscar_propiedades"), None);
    }

    #[test]
    fn unterminated_directive_is_ignored() {
        assert_eq!(parse_directive("[USAR_TOOL:buscar_propiedades tipo=Casa"), None);
    }

    #[test]
    fn empty_body_is_ignored() {
        assert_eq!(parse_directive("[USAR_TOOL:]"), None);
        assert_eq!(parse_directive("[USAR_TOOL:   ]"), None);
    }

    #[test]
    fn bare_name_parses_without_params() {
        let call = parse_directive("Claro: [USAR_TOOL:obtener_info_rekaliber]").unwrap();
        assert_eq!(call.raw_name, "obtener_info_rekaliber");
        assert!(call.params.is_empty());
    }

    #[test]
    fn params_are_split_and_coerced() {
        let call = parse_directive(
            "[USAR_TOOL:buscar_propiedades tipo=Casa ciudad=Cochabamba precio_max=5000]",
        )
        .unwrap();

        assert_eq!(call.raw_name, "buscar_propiedades");
        assert_eq!(call.params["tipo"], Value::Str("Casa".into()));
        assert_eq!(call.params["ciudad"], Value::Str("Cochabamba".into()));
        assert_eq!(call.params["precio_max"], Value::Int(5000));
    }

    #[test]
    fn quoted_values_are_stripped() {
        let call = parse_directive("[USAR_TOOL:buscar_propiedades tipo=\"Casa\" zona='Calacoto']")
            .unwrap();
        assert_eq!(call.params["tipo"], Value::Str("Casa".into()));
        assert_eq!(call.params["zona"], Value::Str("Calacoto".into()));
    }

    #[test]
    fn bare_tokens_become_flags() {
        let call = parse_directive("[USAR_TOOL:contar_propiedades detallado]").unwrap();
        assert_eq!(call.params["detallado"], Value::Bool(true));
    }

    #[test]
    fn value_splits_on_first_equals_only() {
        let call = parse_directive("[USAR_TOOL:buscar_propiedades filtro=a=b]").unwrap();
        assert_eq!(call.params["filtro"], Value::Str("a=b".into()));
    }

    #[test]
    fn only_the_first_directive_counts() {
        let call = parse_directive(
            "[USAR_TOOL:obtener_info_rekaliber] y luego [USAR_TOOL:obtener_info_kristof]",
        )
        .unwrap();
        assert_eq!(call.raw_name, "obtener_info_rekaliber");
    }
}
