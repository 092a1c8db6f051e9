use protocol::UseCaseDraft;

/// Decoded `application/x-www-form-urlencoded` pairs, in body order.
/// Multi-selects arrive as repeated keys.
pub(crate) fn parse_pairs(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes()))
            .into_owned(),
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct EvaluateForm {
    pub(crate) draft: UseCaseDraft,
    pub(crate) api_key: Option<String>,
}

pub(crate) fn parse_evaluate_form(body: &str) -> EvaluateForm {
    let mut form = EvaluateForm::default();
    for (key, value) in parse_pairs(body) {
        match key.as_str() {
            "name" => form.draft.name = value,
            "department" => form.draft.department = value,
            "ai_techniques" => form.draft.ai_techniques = value,
            "stage" => form.draft.stage = value,
            "markets" => form.draft.markets.push(value),
            "data_types" => form.draft.data_types.push(value),
            "description" => form.draft.description = value,
            "api_key" if !value.trim().is_empty() => form.api_key = Some(value.trim().to_string()),
            _ => {}
        }
    }
    form
}
