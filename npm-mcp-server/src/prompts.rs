//! Canned prompt templates. No I/O happens here.

use serde_json::{Map, Value};

use crate::error::{ServerError, ServerResult};
use crate::protocol::{GetPromptResult, PromptMessage};
use crate::registry::PromptSpec;

pub fn render(spec: &PromptSpec, arguments: &Map<String, Value>) -> ServerResult<GetPromptResult> {
    for argument in spec.arguments.iter().filter(|a| a.required) {
        if argument_str(arguments, argument.name).is_none() {
            return Err(ServerError::InvalidParams(format!(
                "{}: missing required argument `{}`",
                spec.name, argument.name
            )));
        }
    }
    let arg = |name: &str| argument_str(arguments, name).unwrap_or_default();

    let (description, text) = match spec.name {
        "analyze-package" => {
            let package = arg("packageName");
            (
                format!("Analyze the npm package {package}"),
                format!(
                    "Analyze the npm package \"{package}\".\n\n\
                     1. Call get_package_info for an overview and get_readme_data to read what it does.\n\
                     2. Call get_download_stats and get_package_quality to judge adoption and upkeep.\n\
                     3. Call get_package_dependencies and get_package_size to gauge its footprint.\n\n\
                     Summarize purpose, health, risks and whether you would recommend it."
                ),
            )
        }
        "compare-packages" => {
            let first = arg("packageName1");
            let second = arg("packageName2");
            (
                format!("Compare {first} and {second}"),
                format!(
                    "Compare the npm packages \"{first}\" and \"{second}\".\n\n\
                     Start with compare_packages, then use get_package_size and \
                     get_package_quality for each. Weigh popularity, maintenance, bundle \
                     size and API fit, and finish with a recommendation."
                ),
            )
        }
        "find-alternatives" => {
            let package = arg("packageName");
            let use_case = argument_str(arguments, "useCase")
                .map(|u| format!(" for {u}"))
                .unwrap_or_default();
            (
                format!("Find alternatives to {package}"),
                format!(
                    "Find alternatives to the npm package \"{package}\"{use_case}.\n\n\
                     Use get_package_info to learn what it does, search_packages with its \
                     keywords to find candidates, and compare_packages against the strongest \
                     few. List each alternative with its trade-offs."
                ),
            )
        }
        other => return Err(ServerError::InvalidParams(format!("unknown prompt: {other}"))),
    };

    Ok(GetPromptResult {
        description,
        messages: vec![PromptMessage::user(text)],
    })
}

fn argument_str<'a>(arguments: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    arguments
        .get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
