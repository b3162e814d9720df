//! Fixed company-information tools.
//!
//! These answer from static records; no parameters, no I/O.

use serde_json::{Value as JsonValue, json};

use crate::registry::{Tool, ToolError};
use crate::value::Params;

pub struct RekaliberInfoTool;

impl Tool for RekaliberInfoTool {
    fn name(&self) -> &str {
        "obtener_info_rekaliber"
    }

    fn description(&self) -> &str {
        "Obtiene información completa sobre la empresa Rekaliber: qué es, \
         quién la fundó, su estado y su enfoque. Úsala cuando pregunten por \
         la empresa o la compañía."
    }

    fn invoke(&self, _params: &Params) -> Result<JsonValue, ToolError> {
        Ok(json!({
            "empresa": "Rekaliber",
            "descripcion": "Empresa nueva e innovadora en el sector tecnológico",
            "fundador": "Kristof Henningsen",
            "estado": "Recientemente creada",
            "enfoque": "Soluciones tecnológicas innovadoras",
            "industria": "Tecnología",
        }))
    }
}

pub struct KristofInfoTool;

impl Tool for KristofInfoTool {
    fn name(&self) -> &str {
        "obtener_info_kristof"
    }

    fn description(&self) -> &str {
        "Obtiene información detallada sobre Kristof Henningsen, fundador de \
         Rekaliber: biografía, origen, residencia y logros. Úsala cuando \
         pregunten por Kristof o por el fundador."
    }

    fn invoke(&self, _params: &Params) -> Result<JsonValue, ToolError> {
        Ok(json!({
            "nombre_completo": "Kristof Henningsen",
            "rol": "Fundador y CEO de Rekaliber",
            "nacionalidad": "Boliviano",
            "lugar_nacimiento": "Oruro, Bolivia",
            "residencia_actual": "Suecia",
            "perfil": "Empresario boliviano con visión internacional",
            "descripcion": "Emprendedor tecnológico que conecta Bolivia con Suecia",
            "logros": [
                "Fundador de Rekaliber",
                "Empresario establecido en Suecia",
                "Promotor de innovación tecnológica",
                "Puente entre el ecosistema boliviano y europeo",
            ],
        }))
    }
}
