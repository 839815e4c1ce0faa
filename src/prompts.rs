pub const ENHANCE_SYSTEM: &str = include_str!("../data/prompts/enhance_system.txt");
pub const ENHANCE_USER: &str = include_str!("../data/prompts/enhance_user.txt");
pub const IMPROVE_SYSTEM: &str = include_str!("../data/prompts/improve_system.txt");
pub const IMPROVE_USER: &str = include_str!("../data/prompts/improve_user.txt");
pub const ALTERNATIVES_SYSTEM: &str = include_str!("../data/prompts/alternatives_system.txt");
pub const ALTERNATIVES_USER: &str = include_str!("../data/prompts/alternatives_user.txt");

/// Replace `{{key}}` placeholders in a template string.
///
/// Only the template is scanned. Substituted values are copied as-is, so a
/// value containing `{{other}}` is never expanded. Unknown keys stay literal.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            result.push_str(&rest[start..]);
            return result;
        };
        let key = &after[..end];
        match vars.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => {
                result.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                result.push_str("{{");
                rest = after;
            }
        }
    }

    result.push_str(rest);
    result
}
