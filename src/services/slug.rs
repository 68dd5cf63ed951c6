/// Turns a display name into a URL-friendly slug: lowercase ASCII
/// alphanumerics with single hyphens between words, nothing else.
pub fn slugify(name: &str) -> String {
  let mut slug = String::with_capacity(name.len());
  let mut pending_hyphen = false;
  for ch in name.chars() {
    if ch.is_ascii_alphanumeric() {
      if pending_hyphen && !slug.is_empty() {
        slug.push('-');
      }
      pending_hyphen = false;
      slug.push(ch.to_ascii_lowercase());
    } else {
      pending_hyphen = true;
    }
  }
  slug
}

#[cfg(test)]
mod tests {
  use super::slugify;

  #[test]
  fn lowercases_and_hyphenates() {
    assert_eq!(slugify("Home Appliances"), "home-appliances");
  }

  #[test]
  fn collapses_separator_runs() {
    assert_eq!(slugify("TV  &  Audio"), "tv-audio");
    assert_eq!(slugify("a---b"), "a-b");
  }

  #[test]
  fn trims_leading_and_trailing_separators() {
    assert_eq!(slugify("  Phones!  "), "phones");
  }

  #[test]
  fn drops_non_ascii() {
    assert_eq!(slugify("Café Déco"), "caf-d-co");
  }

  #[test]
  fn empty_input_gives_empty_slug() {
    assert_eq!(slugify(""), "");
    assert_eq!(slugify("!!!"), "");
  }
}
