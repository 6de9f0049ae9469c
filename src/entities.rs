use crate::description::{entire, to_comment};
use crate::error::GeneratorError;
use crate::generator::Generator;
use crate::index::DEFINES_ROOT;
use crate::schema::ApiDefine;
use crate::session::Session;
use crate::types::NameContext;
use crate::utils::{affix, sorted_by_order, to_lua_ident};

impl Generator<'_> {
    /// Builtins are declared as subtypes of `number`, except the ones the consumer
    /// already knows.
    pub(crate) fn emit_builtins(&self, out: &mut String) -> Result<(), GeneratorError> {
        let resolver = self.resolver();
        for builtin in sorted_by_order(&self.doc.builtin_types) {
            if self.config.is_known_builtin(&builtin.name) {
                continue;
            }
            let link = resolver.view_documentation(&builtin.name)?;
            let comment = format!("{}{link}", affix("", &builtin.description, "\n\n"));
            out.push_str(&to_comment(&resolver, &comment)?);
            out.push_str(&format!("---@class {}:number\n", builtin.name));
        }
        Ok(())
    }

    pub(crate) fn emit_defines(&self, out: &mut String) -> Result<(), GeneratorError> {
        let resolver = self.resolver();
        out.push_str(&to_comment(&resolver, &resolver.view_documentation(DEFINES_ROOT)?)?);
        out.push_str(&format!("---@class {DEFINES_ROOT}\n{DEFINES_ROOT}={{}}\n"));
        let prefix = format!("{DEFINES_ROOT}.");
        for define in sorted_by_order(&self.doc.defines) {
            self.emit_define(out, define, &prefix)?;
        }
        Ok(())
    }

    fn emit_define(
        &self,
        out: &mut String,
        define: &ApiDefine,
        prefix: &str,
    ) -> Result<(), GeneratorError> {
        let resolver = self.resolver();
        let name = format!("{prefix}{}", define.name);
        let link = resolver.view_documentation(&name)?;
        let comment = format!("{}{link}", affix("", &define.description, "\n\n"));
        out.push_str(&to_comment(&resolver, &comment)?);
        out.push_str(&format!("---@class {name}\n{name}={{\n"));
        for value in sorted_by_order(&define.values) {
            let link = resolver.view_documentation(&format!("{name}.{}", value.name))?;
            let comment = format!("{}{link}", affix("", &value.description, "\n\n"));
            out.push_str(&to_comment(&resolver, &comment)?);
            out.push_str(&format!("{}=0,\n", to_lua_ident(&value.name)));
        }
        out.push_str("}\n");

        let child_prefix = format!("{name}.");
        for subkey in sorted_by_order(&define.subkeys) {
            self.emit_define(out, subkey, &child_prefix)?;
        }
        Ok(())
    }

    pub(crate) fn emit_events(
        &self,
        out: &mut String,
        session: &mut Session,
    ) -> Result<(), GeneratorError> {
        let resolver = self.resolver();
        for event in sorted_by_order(&self.doc.events) {
            let link = resolver.view_documentation(&event.name)?;
            out.push_str(&to_comment(&resolver, &entire(&resolver, &event.doc, &link, None)?)?);
            out.push_str(&format!("---@class {}\n", event.name));
            for param in sorted_by_order(&event.data) {
                let comment = format!("{}{link}", affix("", &param.description, "\n\n"));
                out.push_str(&to_comment(&resolver, &comment)?);
                let context = NameContext::member(&event.name, &param.name, &link);
                let ty = self.format_type(session, Some(&param.ty), &context, false)?;
                let nullable = if param.optional { "|nil" } else { "" };
                out.push_str(&format!("---@field {} {ty}{nullable}\n", param.name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::loader::load;

    const SOURCE: &str = r#"{
        "application": "factorio", "stage": "runtime", "api_version": 1,
        "builtin_types": [
            { "name": "string", "order": 0, "description": "Text." },
            { "name": "float", "order": 1, "description": "A 32-bit float." },
            { "name": "uint", "order": 2, "description": "" }
        ],
        "classes": [ { "name": "LuaPlayer", "order": 0, "description": "" } ],
        "events": [
            { "name": "on_player_died", "order": 0, "description": "Called when a player dies.",
              "data": [
                { "name": "player_index", "order": 0, "description": "", "type": "uint", "optional": false },
                { "name": "cause", "order": 1, "description": "Who killed.", "type": "LuaPlayer", "optional": true }
              ] }
        ],
        "defines": [
            { "name": "direction", "order": 0, "description": "Directions.",
              "values": [ { "name": "north", "order": 0, "description": "" },
                          { "name": "end", "order": 1, "description": "" } ],
              "subkeys": [ { "name": "sub", "order": 0, "description": "" } ] }
        ]
    }"#;
    const BASE: &str = "https://lua-api.factorio.com/latest/";

    #[test]
    fn test_builtins() {
        let doc = load(SOURCE, "runtime-api.json").unwrap();
        let config = GeneratorConfig::default();
        let generator = Generator::new(&doc, &config).unwrap();
        let mut out = String::new();
        generator.emit_builtins(&mut out).unwrap();
        assert_eq!(
            out,
            format!(
                "---A 32-bit float.\n---\n---[View documentation]({BASE}Builtin-Types.html#float)\n\
                 ---@class float:number\n\
                 ---[View documentation]({BASE}Builtin-Types.html#uint)\n\
                 ---@class uint:number\n"
            )
        );
    }

    #[test]
    fn test_known_builtins_are_configurable() {
        let doc = load(SOURCE, "runtime-api.json").unwrap();
        let config = GeneratorConfig {
            known_builtins: vec!["float".to_string()],
            ..GeneratorConfig::default()
        };
        let generator = Generator::new(&doc, &config).unwrap();
        let mut out = String::new();
        generator.emit_builtins(&mut out).unwrap();
        assert!(out.contains("---@class string:number\n"));
        assert!(!out.contains("float"));
    }

    #[test]
    fn test_defines() {
        let doc = load(SOURCE, "runtime-api.json").unwrap();
        let config = GeneratorConfig::default();
        let generator = Generator::new(&doc, &config).unwrap();
        let mut out = String::new();
        generator.emit_defines(&mut out).unwrap();
        let code: Vec<&str> = out.lines().filter(|line| !line.starts_with("---")).collect();
        assert_eq!(
            code,
            vec![
                "defines={}",
                "defines.direction={",
                "north=0,",
                "end_=0,",
                "}",
                "defines.direction.sub={",
                "}",
            ]
        );
        assert!(out.contains(&format!("---Directions.\n---\n---[View documentation]({BASE}defines.html#defines.direction)\n")));
        assert!(out.contains(&format!("[View documentation]({BASE}defines.html#defines.direction.north)")));
    }

    #[test]
    fn test_events() {
        let doc = load(SOURCE, "runtime-api.json").unwrap();
        let config = GeneratorConfig::default();
        let generator = Generator::new(&doc, &config).unwrap();
        let mut session = Session::new();
        let mut out = String::new();
        generator.emit_events(&mut out, &mut session).unwrap();
        assert!(out.starts_with("---Called when a player dies.\n---\n---[View documentation]"));
        assert!(out.contains("---@class on_player_died\n"));
        assert!(out.contains("---@field player_index uint\n"));
        assert!(out.contains("---Who killed.\n---\n---[View documentation]"));
        assert!(out.contains("---@field cause LuaPlayer|nil\n"));
    }
}
