//! Prompt construction for the two model calls.

use serde_json::Value as JsonValue;

/// System preamble for the first completion: who the assistant is, which
/// tools exist, and the exact directive syntax for requesting one.
pub fn system_prompt<'a>(tools: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let mut catalogue = String::from("HERRAMIENTAS DISPONIBLES:\n\n");
    for (name, description) in tools {
        catalogue.push_str(&format!("📌 {name}\n   {description}\n\n"));
    }

    format!(
        "Eres un asistente útil y amigable de Rekaliber.\n\n\
         {catalogue}\
         REGLAS IMPORTANTES:\n\
         1. Cuando necesites información específica, DEBES usar las herramientas\n\
         2. Para usar una herramienta, responde EXACTAMENTE: [USAR_TOOL:nombre_de_la_tool]\n\
         3. Puedes añadir parámetros: [USAR_TOOL:nombre_de_la_tool clave=valor]\n\
         4. NO inventes información, usa SIEMPRE las herramientas cuando sea necesario\n\
         5. Mantén un tono profesional pero amigable\n\
         6. Puedes usar emojis para hacer la conversación más amena\n\
         7. Responde de forma concisa y directa\n\n\
         EJEMPLOS:\n\
         - Usuario: \"¿Qué es Rekaliber?\" → Tú respondes: [USAR_TOOL:obtener_info_rekaliber]\n\
         - Usuario: \"¿De dónde es Kristof?\" → Tú respondes: [USAR_TOOL:obtener_info_kristof]\n\
         - Usuario: \"Hola\" → Tú respondes directamente sin herramientas\n\n\
         Si la pregunta requiere información de una herramienta, SIEMPRE úsala."
    )
}

/// Prompt for the second completion: the serialized tool result plus the
/// original question, answered naturally and without revealing that a
/// tool ran.
pub fn tool_followup_prompt(tool_name: &str, payload: &JsonValue, user_message: &str) -> String {
    let serialized =
        serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());

    format!(
        "Has usado la herramienta '{tool_name}' y obtuviste este resultado:\n\n\
         {serialized}\n\n\
         Pregunta original del usuario: \"{user_message}\"\n\n\
         Ahora responde al usuario de forma natural, clara y amigable usando esta información. \
         Incluye emojis si es apropiado. NO menciones que usaste una herramienta."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn system_prompt_lists_every_tool() {
        let tools = [
            ("obtener_info_rekaliber", "Información de la empresa"),
            ("buscar_propiedades", "Busca propiedades"),
        ];
        let prompt = system_prompt(tools.iter().copied());

        assert!(prompt.contains("obtener_info_rekaliber"));
        assert!(prompt.contains("Busca propiedades"));
        assert!(prompt.contains("[USAR_TOOL:"));
    }

    #[test]
    fn followup_embeds_payload_and_question() {
        let prompt = tool_followup_prompt(
            "obtener_info_rekaliber",
            &json!({"empresa": "Rekaliber"}),
            "¿Qué es Rekaliber?",
        );

        assert!(prompt.contains("obtener_info_rekaliber"));
        assert!(prompt.contains("\"empresa\": \"Rekaliber\""));
        assert!(prompt.contains("¿Qué es Rekaliber?"));
        assert!(prompt.contains("NO menciones"));
    }
}
