use storage::{
    EngineResult,
    dto::rules::{RuleDescription, describe_catalog},
    rules::ClassRule,
};

pub fn list_rules() -> Vec<RuleDescription> {
    describe_catalog()
}

/// Accepts the catalog name, case-insensitive, with `-` or `_` separators
pub fn get_rule(name: &str) -> EngineResult<RuleDescription> {
    let rule: ClassRule = name.parse()?;
    Ok(RuleDescription::from(rule.profile()))
}
