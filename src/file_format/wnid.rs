use regex::Regex;

lazy_static! {
    static ref WNID_RE: Regex = Regex::new(r"^([nvasr])(\d{1,8})$").unwrap();
}

/// Split a WordNet id like `n02084071` into its part-of-speech letter and
/// offset.  Offsets shorter than 8 digits are accepted since hand-written
/// lists frequently drop the zero padding.
pub fn parse_wnid(wnid: &str) -> Option<(char, u32)> {
    let caps = WNID_RE.captures(wnid.trim())?;
    let pos = caps.get(1)?.as_str().chars().next()?;
    let offset = caps.get(2)?.as_str().parse().ok()?;
    Some((pos, offset))
}

pub fn format_wnid(pos: char, offset: u32) -> String {
    format!("{}{:08}", pos, offset)
}

/// Canonical zero-padded form of a WNID, or None if it doesn't look like one.
pub fn normalize_wnid(wnid: &str) -> Option<String> {
    parse_wnid(wnid).map(|(pos, offset)| format_wnid(pos, offset))
}

#[test]
fn test_parse_wnid() {
    assert_eq!(parse_wnid("n02084071"), Some(('n', 2084071)));
    assert_eq!(parse_wnid(" v00001740 "), Some(('v', 1740)));
    assert_eq!(normalize_wnid("n2084071").as_deref(), Some("n02084071"));

    assert_eq!(parse_wnid("invalid"), None);
    assert_eq!(parse_wnid("nABC"), None);
    assert_eq!(parse_wnid("n"), None);
    assert_eq!(parse_wnid("x02084071"), None);
    assert_eq!(parse_wnid("n020840710"), None);
}
