//! Line-oriented builder for make syntax.

/// Accumulates script text one line at a time.
///
/// Recipe lines are tab-indented; list variables are split one item per line
/// with backslash continuations.
#[derive(Debug, Default)]
pub struct ScriptWriter {
  out: String,
}

impl ScriptWriter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn line(&mut self, text: &str) {
    self.out.push_str(text);
    self.out.push('\n');
  }

  pub fn blank(&mut self) {
    self.out.push('\n');
  }

  /// A `#`-framed comment block.
  pub fn banner(&mut self, text: &str) {
    self.line("#");
    for line in text.lines() {
      self.line(&format!("# {}", line));
    }
    self.line("#");
  }

  /// Recursively expanded assignment: `NAME = value`.
  pub fn assign(&mut self, name: &str, value: &str) {
    if value.is_empty() {
      self.line(&format!("{} =", name));
    } else {
      self.line(&format!("{} = {}", name, value));
    }
  }

  /// Simply expanded assignment: `NAME := value`.
  pub fn assign_immediate(&mut self, name: &str, value: &str) {
    if value.is_empty() {
      self.line(&format!("{} :=", name));
    } else {
      self.line(&format!("{} := {}", name, value));
    }
  }

  /// Multi-line list assignment, one item per continuation line.
  pub fn assign_list<I, S>(&mut self, name: &str, items: I)
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let items: Vec<S> = items.into_iter().collect();
    if items.is_empty() {
      self.assign(name, "");
      return;
    }
    self.line(&format!("{} = \\", name));
    let last = items.len() - 1;
    for (i, item) in items.iter().enumerate() {
      if i == last {
        self.line(&format!("\t{}", item.as_ref()));
      } else {
        self.line(&format!("\t{} \\", item.as_ref()));
      }
    }
  }

  /// Rule header: `targets: prerequisites`.
  pub fn rule<T, P>(&mut self, targets: &[T], prerequisites: &[P])
  where
    T: AsRef<str>,
    P: AsRef<str>,
  {
    let mut header = join_words(targets);
    header.push(':');
    let prereqs = join_words(prerequisites);
    if !prereqs.is_empty() {
      header.push(' ');
      header.push_str(&prereqs);
    }
    self.line(&header);
  }

  /// Rule header with a single order-only prerequisite: `target: | prereq`.
  pub fn order_only_rule(&mut self, target: &str, prerequisite: &str) {
    self.line(&format!("{}: | {}", target, prerequisite));
  }

  /// One tab-indented recipe line.
  pub fn recipe(&mut self, command: &str) {
    self.line(&format!("\t{}", command));
  }

  /// Recipe line printing `text`, with `%b` escapes honoured.
  ///
  /// `text` is make syntax: variable references expand before the shell sees
  /// them. Single quotes are escaped for the shell.
  pub fn echo(&mut self, text: &str) {
    self.recipe(&format!("@printf '%b\\n' {}", shell_quote(text)));
  }

  pub fn finish(self) -> String {
    self.out
  }
}

fn join_words<S: AsRef<str>>(words: &[S]) -> String {
  words
    .iter()
    .map(AsRef::as_ref)
    .filter(|w| !w.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

/// Wrap `text` in single quotes for `sh`.
pub fn shell_quote(text: &str) -> String {
  format!("'{}'", text.replace('\'', r"'\''"))
}

/// Escape literal text so make does not expand it.
pub fn escape_make(text: &str) -> String {
  text.replace('$', "$$")
}
