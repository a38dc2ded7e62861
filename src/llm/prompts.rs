use crate::models::Action;

const EXPLAIN_TEMPLATE: &str = r#"You are a helpful coding assistant. Analyze the following {language} code and explain what it does in a clear and concise way.

Code:
```{language}
{code}
```

Provide:
1. A brief overview of what the code does
2. Explanation of key components
3. Any notable patterns or techniques used

Keep the explanation clear and beginner-friendly."#;

const FIND_BUGS_TEMPLATE: &str = r#"You are an expert code reviewer. Analyze the following {language} code and identify any bugs, errors, or potential issues.

Code:
```{language}
{code}
```

Provide:
1. List of bugs or errors found
2. Explanation of why each is a problem
3. Suggested fixes

If no bugs are found, mention that and provide any general code quality observations."#;

const IMPROVE_TEMPLATE: &str = r#"You are a senior software engineer. Review the following {language} code and suggest improvements.

Code:
```{language}
{code}
```

Provide:
1. Specific improvements for code quality
2. Performance optimizations if applicable
3. Best practices recommendations
4. Improved version of the code if needed

Focus on practical, actionable suggestions."#;

fn template_for(action: Action) -> &'static str {
    match action {
        Action::Explain => EXPLAIN_TEMPLATE,
        Action::FindBugs => FIND_BUGS_TEMPLATE,
        Action::Improve => IMPROVE_TEMPLATE,
    }
}

/// Builds the prompt sent to the provider.
///
/// `code` is embedded verbatim in a fence labelled with `language`; a snippet
/// that itself contains a fence is not escaped.
pub fn build_prompt(code: &str, language: &str, action: Action) -> String {
    let template = template_for(action);
    let (head, tail) = template
        .split_once("{code}")
        .unwrap_or((template, ""));

    // The code goes in last so placeholders inside it stay untouched.
    let mut prompt = String::with_capacity(template.len() + code.len() + 2 * language.len());
    prompt.push_str(&head.replace("{language}", language));
    prompt.push_str(code);
    prompt.push_str(tail);
    prompt
}
