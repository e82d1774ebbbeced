/// Maps a careers position code to its display label. Unknown codes are
/// returned unchanged.
pub fn format_position(code: &str) -> &str {
    match code {
        "chartered_accountant" => "Chartered Accountant",
        "articleship" => "Articleship",
        "others" => "Others",
        other => other,
    }
}
