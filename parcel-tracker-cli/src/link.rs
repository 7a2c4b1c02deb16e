//! Shareable tracking links
//!
//! The active tracking number travels in the `tn` query parameter, so a link
//! like `https://host/track?tn=TM123456789` resumes tracking the same parcel.

/// Query parameter carrying the tracking number
pub const TRACKING_PARAM: &str = "tn";

/// Split a link into (base, query, fragment)
fn split_link(link: &str) -> (&str, Option<&str>, Option<&str>) {
    let (rest, fragment) = match link.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (link, None),
    };
    match rest.split_once('?') {
        Some((base, query)) => (base, Some(query), fragment),
        None => (rest, None, fragment),
    }
}

/// Tracking number carried by `link`, if any
pub fn tracking_from_link(link: &str) -> Option<String> {
    let (_, query, _) = split_link(link.trim());
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == TRACKING_PARAM)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `base` with its `tn` parameter set to `tracking_number`. Other query
/// parameters and the fragment are kept.
pub fn share_link(base: &str, tracking_number: &str) -> String {
    let (path, query, fragment) = split_link(base.trim());
    let tracking_param = format!("{}={}", TRACKING_PARAM, tracking_number);

    let mut params: Vec<&str> = query
        .map(|q| {
            q.split('&')
                .filter(|pair| !pair.is_empty())
                .filter(|pair| pair.split('=').next() != Some(TRACKING_PARAM))
                .collect()
        })
        .unwrap_or_default();
    params.push(&tracking_param);

    let mut link = format!("{}?{}", path, params.join("&"));
    if let Some(fragment) = fragment {
        link.push('#');
        link.push_str(fragment);
    }
    link
}
