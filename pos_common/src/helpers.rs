/// Interpret an optional environment value as a boolean flag.
///
/// `1`, `true`, `yes` and `on` are truthy; `0`, `false`, `no` and `off` are falsy (case-insensitive). Anything else,
/// including a missing value, yields `default`.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let Some(value) = value else {
        return default;
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}
