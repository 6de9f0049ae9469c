use fmtk_luadoc::{generate, GeneratorConfig};

fn main() {
    let api = r#"{
        "application": "factorio",
        "stage": "runtime",
        "api_version": 1,
        "builtin_types": [ { "name": "uint", "order": 0, "description": "A 32-bit unsigned integer." } ],
        "classes": [
            { "name": "LuaPlayer", "order": 0, "description": "A player in the game.",
              "attributes": [ { "name": "index", "order": 0, "description": "", "type": "uint", "read": true, "write": false } ] }
        ]
    }"#;

    match generate(api, "runtime-api.json", &GeneratorConfig::default()) {
        Ok(stubs) => {
            println!("Generated annotation stubs:\n{stubs}");
        }
        Err(e) => {
            eprintln!("Failed to generate stubs: {:?}", miette::Report::new(e));
        }
    }
}
