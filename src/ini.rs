//! A small INI reader/writer covering what ReShade presets and vkBasalt
//! configuration files use: a default section, named sections, `key = value`
//! pairs and `;`/`#` comments.

use crate::Error;

use std::fmt;
use std::str::FromStr;

pub const DEFAULT_SECTION: &str = "DEFAULT";

const QUOTES: [char; 2] = ['"', '`'];

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
  name: String,
  entries: Vec<(String, String)>
}

impl Section {
  pub fn new(name: impl Into<String>) -> Self {
    Section { name: name.into(), entries: Vec::new() }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn is_default(&self) -> bool {
    self.name == DEFAULT_SECTION
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.entries.iter()
      .find(|(k, _)| k == key)
      .map(|(_, value)| value.as_str())
  }

  /// Sets `key`, keeping its original position if it is already present.
  pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
    let key = key.into();
    let value = value.into();
    match self.entries.iter_mut().find(|(k, _)| *k == key) {
      Some((_, slot)) => *slot = value,
      None => self.entries.push((key, value))
    };
  }

  pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
    self.entries.iter().map(|(key, value)| (key.as_str(), value.as_str()))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// An ordered INI document. The default section always exists and comes first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
  sections: Vec<Section>
}

impl Document {
  pub fn new() -> Self {
    Document { sections: vec![Section::new(DEFAULT_SECTION)] }
  }

  pub fn default_section(&self) -> &Section {
    &self.sections[0]
  }

  pub fn default_section_mut(&mut self) -> &mut Section {
    &mut self.sections[0]
  }

  pub fn sections(&self) -> impl Iterator<Item = &Section> {
    self.sections.iter()
  }

  pub fn section(&self, name: &str) -> Option<&Section> {
    self.sections.iter().find(|section| section.name == name)
  }

  /// Returns the named section, appending an empty one if it does not exist yet.
  pub fn section_mut(&mut self, name: &str) -> &mut Section {
    let index = match self.sections.iter().position(|section| section.name == name) {
      Some(index) => index,
      None => {
        self.sections.push(Section::new(name));
        self.sections.len() - 1
      }
    };

    &mut self.sections[index]
  }
}

impl Default for Document {
  fn default() -> Self {
    Document::new()
  }
}

impl FromStr for Document {
  type Err = Error;

  fn from_str(text: &str) -> Result<Self, Self::Err> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut document = Document::new();
    let mut current = DEFAULT_SECTION.to_owned();

    for (index, line) in text.lines().enumerate() {
      let line_number = index + 1;
      let line = line.trim();
      if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
        continue;
      };

      if let Some(header) = line.strip_prefix('[') {
        let name = header.find(']')
          .map(|end| header[..end].trim())
          .ok_or_else(|| Error::UnclosedSection { line: line_number, text: line.to_owned() })?;
        current = name.to_owned();
        document.section_mut(&current);
        continue;
      };

      let delimiter = line.find(['=', ':'])
        .ok_or_else(|| Error::MissingDelimiter { line: line_number, text: line.to_owned() })?;
      let key = line[..delimiter].trim();
      if key.is_empty() {
        return Err(Error::EmptyKey { line: line_number, text: line.to_owned() });
      };

      let value = parse_value(&line[delimiter + 1..]);
      document.section_mut(&current).set(key, value);
    };

    Ok(document)
  }
}

/// A value that both opens and closes with the same quote is everything between
/// them, so quote characters inside it need no escaping. Otherwise the first
/// matching quote closes it and the rest of the line is a comment.
fn parse_value(raw: &str) -> &str {
  let raw = raw.trim();
  for quote in QUOTES {
    let Some(inner) = raw.strip_prefix(quote) else {
      continue;
    };

    if let Some(whole) = inner.strip_suffix(quote) {
      return whole;
    };

    if let Some(end) = inner.find(quote) {
      return &inner[..end];
    };
  };

  strip_inline_comment(raw).trim_end()
}

fn strip_inline_comment(value: &str) -> &str {
  let mut previous = None;
  for (i, c) in value.char_indices() {
    if matches!(c, ';' | '#') && previous.is_some_and(char::is_whitespace) {
      return &value[..i];
    };
    previous = Some(c);
  };

  value
}

fn needs_quoting(value: &str) -> bool {
  value.contains([';', '#'])
    || value.trim() != value
    || value.starts_with(QUOTES)
}

struct Value<'a>(&'a str);

impl fmt::Display for Value<'_> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    if needs_quoting(self.0) {
      let quote = if self.0.contains('"') { '`' } else { '"' };
      write!(f, "{quote}{}{quote}", self.0)
    } else {
      f.write_str(self.0)
    }
  }
}

impl fmt::Display for Document {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    for (key, value) in self.default_section().entries() {
      writeln!(f, "{key} = {}", Value(value))?;
    };

    for section in self.sections.iter().filter(|section| !section.is_default()) {
      writeln!(f)?;
      writeln!(f, "[{}]", section.name)?;
      for (key, value) in section.entries() {
        writeln!(f, "{key} = {}", Value(value))?;
      };
    };

    Ok(())
  }
}
