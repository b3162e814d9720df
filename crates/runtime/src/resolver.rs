//! Tool-name normalization and alias fallback.
//!
//! Models restate tool names with different casing, accents, and
//! connecting characters; exact string matching alone causes spurious
//! dispatch failures. Every lookup therefore goes through [`normalize`],
//! and names that still miss get one retry through the static alias
//! table below.

/// Known misspellings and variants, mapped to the canonical registered
/// name. Both sides are normalized at lookup time, so entries can be
/// written in their natural form.
const ALIASES: &[(&str, &str)] = &[
    ("busqueda_propiedades", "buscar_propiedades"),
    ("buscar-propiedades", "buscar_propiedades"),
    ("buscar_propiedad", "buscar_propiedades"),
    ("busca_propiedades", "buscar_propiedades"),
    ("search_properties", "buscar_propiedades"),
    ("contar_propiedad", "contar_propiedades"),
    ("conteo_propiedades", "contar_propiedades"),
    ("count_properties", "contar_propiedades"),
    ("info_rekaliber", "obtener_info_rekaliber"),
    ("rekaliber_info", "obtener_info_rekaliber"),
    ("informacion_rekaliber", "obtener_info_rekaliber"),
    ("info_kristof", "obtener_info_kristof"),
    ("kristof_info", "obtener_info_kristof"),
    ("obtener_info_kristoff", "obtener_info_kristof"),
];

/// Canonicalize a tool name: lowercase, fold accents, collapse
/// whitespace runs to a single underscore, drop anything that is not
/// alphanumeric or underscore.
pub fn normalize(name: &str) -> String {
    let lowered: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(fold_diacritic)
        .collect();

    let mut out = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            in_whitespace = false;
            if c.is_ascii_alphanumeric() || c == '_' {
                out.push(c);
            }
        }
    }
    out
}

/// Look up the canonical name for an already-normalized request.
pub fn alias_target(normalized: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(variant, _)| normalize(variant) == normalized)
        .map(|&(_, canonical)| canonical)
}

// Covers the Latin repertoire the models actually emit; a full Unicode
// decomposition would be overkill for four Spanish tool names.
fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_case_and_accent_insensitive() {
        assert_eq!(normalize("Búsqueda_Propiedades"), "busqueda_propiedades");
        assert_eq!(normalize("OBTENER_INFO_REKALIBER"), "obtener_info_rekaliber");
        assert_eq!(normalize("Información"), "informacion");
    }

    #[test]
    fn normalize_collapses_whitespace_to_underscore() {
        assert_eq!(normalize("  buscar   propiedades "), "buscar_propiedades");
    }

    #[test]
    fn normalize_drops_punctuation() {
        assert_eq!(normalize("buscar-propiedades!"), "buscarpropiedades");
        assert_eq!(normalize("¿contar_propiedades?"), "contar_propiedades");
    }

    #[test]
    fn alias_lookup_normalizes_both_sides() {
        assert_eq!(
            alias_target(&normalize("Búsqueda_Propiedades")),
            Some("buscar_propiedades")
        );
        assert_eq!(
            alias_target(&normalize("Buscar-Propiedades")),
            Some("buscar_propiedades")
        );
        assert_eq!(alias_target("nombre_desconocido"), None);
    }
}
