use crossterm::event::{KeyCode, KeyEvent};

/// Per-field character limit
pub const CHAR_LIMIT: usize = 150;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: String,
}

impl FormField {
    fn new(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            label,
            placeholder,
            value: String::new(),
        }
    }

    fn push(&mut self, c: char) {
        if self.value.chars().count() < CHAR_LIMIT {
            self.value.push(c);
        }
    }
}

/// What the form asks of its owner after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    None,
    Cancel,
    Submit(FormValues),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub path: String,
    pub category: String,
}

/// The add-project form: name, path and optional category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectForm {
    pub fields: [FormField; 3],
    pub focused: usize,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            fields: [
                FormField::new("Name", "Project Name"),
                FormField::new("Path", "Project Path (e.g., ~/projects/myapp)"),
                FormField::new("Category", "Category (optional)"),
            ],
            focused: 0,
        }
    }
}

impl ProjectForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    fn focus_prev(&mut self) {
        self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
    }

    fn is_last_field(&self) -> bool {
        self.focused == self.fields.len() - 1
    }

    /// Trimmed values, if name and path are both filled in
    pub fn values(&self) -> Option<FormValues> {
        let name = self.fields[0].value.trim();
        let path = self.fields[1].value.trim();
        if name.is_empty() || path.is_empty() {
            return None;
        }
        Some(FormValues {
            name: name.to_string(),
            path: path.to_string(),
            category: self.fields[2].value.trim().to_string(),
        })
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => FormAction::Cancel,
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                FormAction::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                FormAction::None
            }
            KeyCode::Enter => {
                if self.is_last_field() {
                    match self.values() {
                        Some(values) => FormAction::Submit(values),
                        None => FormAction::None,
                    }
                } else {
                    self.focus_next();
                    FormAction::None
                }
            }
            KeyCode::Backspace => {
                self.fields[self.focused].value.pop();
                FormAction::None
            }
            KeyCode::Char(c) => {
                self.fields[self.focused].push(c);
                FormAction::None
            }
            _ => FormAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(form: &mut ProjectForm, code: KeyCode) -> FormAction {
        form.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(form: &mut ProjectForm, text: &str) {
        for c in text.chars() {
            press(form, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_enter_advances_then_submits() {
        let mut form = ProjectForm::default();
        type_str(&mut form, " demo ");
        assert_eq!(press(&mut form, KeyCode::Enter), FormAction::None);
        type_str(&mut form, "~/code/demo");
        assert_eq!(press(&mut form, KeyCode::Enter), FormAction::None);
        assert_eq!(form.focused, 2);
        type_str(&mut form, "work");

        assert_eq!(
            press(&mut form, KeyCode::Enter),
            FormAction::Submit(FormValues {
                name: "demo".to_string(),
                path: "~/code/demo".to_string(),
                category: "work".to_string(),
            })
        );
    }

    #[test]
    fn test_submit_requires_name_and_path() {
        let mut form = ProjectForm::default();
        press(&mut form, KeyCode::Tab);
        type_str(&mut form, "/srv/app");
        press(&mut form, KeyCode::Tab);

        assert_eq!(press(&mut form, KeyCode::Enter), FormAction::None);
        assert_eq!(form.focused, 2);
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut form = ProjectForm::default();
        press(&mut form, KeyCode::BackTab);
        assert_eq!(form.focused, 2);
        press(&mut form, KeyCode::Tab);
        assert_eq!(form.focused, 0);
    }

    #[test]
    fn test_char_limit_and_backspace() {
        let mut form = ProjectForm::default();
        type_str(&mut form, &"x".repeat(CHAR_LIMIT + 10));
        assert_eq!(form.fields[0].value.len(), CHAR_LIMIT);
        press(&mut form, KeyCode::Backspace);
        assert_eq!(form.fields[0].value.len(), CHAR_LIMIT - 1);
    }

    #[test]
    fn test_escape_cancels_and_reset_clears() {
        let mut form = ProjectForm::default();
        type_str(&mut form, "demo");
        assert_eq!(press(&mut form, KeyCode::Esc), FormAction::Cancel);
        form.reset();
        assert_eq!(form, ProjectForm::default());
    }
}
