//! Line extraction of nearby sites from free-text model output.

use geoprospect_core::models::NearbyPlace;

/// Extract nearby sites, one per line.
///
/// When the text contains list items, only list items are read. Markdown
/// links and trailing bare URLs become the site URI; lines ending in `:`
/// are treated as headings. Titles are deduplicated case-insensitively.
pub fn extract_nearby_places(text: &str) -> Vec<NearbyPlace> {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let has_list = lines.iter().any(|line| strip_list_marker(line).is_some());

    let mut places: Vec<NearbyPlace> = Vec::new();
    for line in lines {
        let item = match strip_list_marker(line) {
            Some(item) => item,
            None if has_list => continue,
            None => line,
        };
        if item.starts_with('#') || item.ends_with(':') {
            continue;
        }

        let Some(place) = parse_item(item) else {
            continue;
        };
        let duplicate = places.iter().any(|p| p.title.eq_ignore_ascii_case(&place.title));
        if !duplicate {
            places.push(place);
        }
    }
    places
}

/// Remove a leading bullet (`-`, `*`, `+`, `•`) or ordinal (`1.`, `2)`)
fn strip_list_marker(line: &str) -> Option<&str> {
    for bullet in ['-', '*', '+', '•'] {
        if let Some(rest) = line.strip_prefix(bullet) {
            if rest.starts_with(char::is_whitespace) {
                return Some(rest.trim());
            }
        }
    }

    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return Some(rest.trim());
        }
    }
    None
}

fn parse_item(item: &str) -> Option<NearbyPlace> {
    let item = item.replace("**", "");

    if let Some((title, uri)) = markdown_link(&item) {
        let title = clean_title(title);
        return (!title.is_empty()).then(|| NearbyPlace::new(title, Some(uri.to_string())));
    }

    if let Some((head, last)) = item.rsplit_once(char::is_whitespace) {
        if is_url(last) {
            let title = clean_title(head);
            return (!title.is_empty()).then(|| NearbyPlace::new(title, Some(last.to_string())));
        }
    }

    if is_url(&item) {
        return None;
    }

    let title = clean_title(&item);
    (!title.is_empty()).then(|| NearbyPlace::new(title, None))
}

/// First `[title](uri)` in the item
fn markdown_link(item: &str) -> Option<(&str, &str)> {
    let open = item.find('[')?;
    let close = open + item[open..].find("](")?;
    let end = close + item[close..].find(')')?;
    let title = &item[open + 1..close];
    let uri = item[close + 2..end].trim();
    is_url(uri).then_some((title, uri))
}

fn is_url(token: &str) -> bool {
    token.starts_with("http://") || token.starts_with("https://")
}

fn clean_title(title: &str) -> String {
    title
        .trim()
        .trim_end_matches(|c: char| matches!(c, '-' | '–' | ':' | '(' | ',') || c.is_whitespace())
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_links_and_bare_urls() {
        let text = "\
Nearby projects:
- [Batu Hijau](https://example.com/batu-hijau) - porphyry Cu-Au
* Elang project https://example.com/elang
1. Dodo Rinti
2) **Onto** – discovery";
        let places = extract_nearby_places(text);

        assert_eq!(places.len(), 4);
        assert_eq!(
            places[0],
            NearbyPlace::new("Batu Hijau", Some("https://example.com/batu-hijau".to_string()))
        );
        assert_eq!(
            places[1],
            NearbyPlace::new("Elang project", Some("https://example.com/elang".to_string()))
        );
        assert_eq!(places[2], NearbyPlace::new("Dodo Rinti", None));
        assert_eq!(places[3].title, "Onto – discovery");
    }

    #[test]
    fn test_prose_ignored_when_list_present() {
        let text = "Here are the closest sites.\n- Grasberg\n- Ertsberg\nLet me know if you need more.";
        let titles: Vec<_> = extract_nearby_places(text).into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["Grasberg", "Ertsberg"]);
    }

    #[test]
    fn test_plain_lines_without_list() {
        let text = "Grasberg\n\nErtsberg\n";
        assert_eq!(extract_nearby_places(text).len(), 2);
    }

    #[test]
    fn test_duplicate_titles_dropped() {
        let text = "- Grasberg\n- grasberg https://example.com/g\n- ## Heading";
        let places = extract_nearby_places(text);
        assert_eq!(places, vec![NearbyPlace::new("Grasberg", None)]);
    }

    #[test]
    fn test_bare_url_line_skipped() {
        assert!(extract_nearby_places("- https://example.com/only-a-link").is_empty());
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_nearby_places("").is_empty());
    }
}
