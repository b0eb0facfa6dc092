//! Sidebar form with one control per schema feature.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{FeatureDefinition, ValueType, FEATURES};
use crate::ports::InputSource;
use crate::tui::styles::MedicalTheme;

/// Form field bound to a feature definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub def: &'static FeatureDefinition,
    pub value: String,
}

impl FormField {
    fn with_default(def: &'static FeatureDefinition) -> Self {
        Self {
            def,
            value: def.format_value(def.default),
        }
    }

    fn is_binary(&self) -> bool {
        self.def.value_type == ValueType::Binary
    }
}

/// Sidebar form state
pub struct SidebarForm {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for SidebarForm {
    fn default() -> Self {
        Self {
            fields: FEATURES.iter().map(FormField::with_default).collect(),
            selected_field: 0,
            error_message: None,
        }
    }
}

impl SidebarForm {
    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Type a character into the current field.
    ///
    /// Binary fields take `0` or `1` as a selection; numeric fields accept
    /// digits, `.` and `-`. Returns whether the value changed.
    pub fn input_char(&mut self, c: char) -> bool {
        let field = &mut self.fields[self.selected_field];
        let changed = if field.is_binary() {
            if c == '0' || c == '1' {
                field.value = c.to_string();
                true
            } else {
                false
            }
        } else if c.is_ascii_digit() || c == '.' || c == '-' {
            field.value.push(c);
            true
        } else {
            false
        };

        if changed {
            self.error_message = None;
        }
        changed
    }

    /// Flip a binary field between 0 and 1. Returns whether it changed.
    pub fn toggle(&mut self) -> bool {
        let field = &mut self.fields[self.selected_field];
        if !field.is_binary() {
            return false;
        }
        field.value = if field.value.trim() == "1" { "0" } else { "1" }.to_string();
        self.error_message = None;
        true
    }

    /// Delete the last character
    pub fn delete_char(&mut self) -> bool {
        let field = &mut self.fields[self.selected_field];
        if field.is_binary() {
            return false;
        }
        self.error_message = None;
        field.value.pop().is_some()
    }

    /// Clear the current field; an empty field falls back to its default.
    pub fn clear_field(&mut self) -> bool {
        let field = &mut self.fields[self.selected_field];
        if field.is_binary() || field.value.is_empty() {
            return false;
        }
        field.value.zeroize();
        self.error_message = None;
        true
    }

    /// Restore every field to its schema default.
    pub fn reset(&mut self) {
        self.clear_sensitive();
        self.fields = FEATURES.iter().map(FormField::with_default).collect();
    }

    /// Wipe all field buffers from memory.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            field.value.zeroize();
        }
        self.error_message = None;
        self.selected_field = 0;
    }
}

impl InputSource for SidebarForm {
    fn raw_value(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.def.key == key)
            .map(|f| f.value.as_str())
    }
}

/// Render the "Patient Parameters" sidebar
pub fn render_sidebar(f: &mut Frame, area: Rect, state: &SidebarForm) {
    let block = Block::default()
        .title(Span::styled(" Patient Parameters ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let label_width = state
        .fields
        .iter()
        .map(|f| f.def.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(state.fields.len() * 2);
    for (i, field) in state.fields.iter().enumerate() {
        let is_selected = i == state.selected_field;
        let marker = if is_selected { "▸ " } else { "  " };
        let label_style = if is_selected {
            MedicalTheme::focused()
        } else {
            MedicalTheme::text_secondary()
        };

        let value = if field.is_binary() {
            match field.value.trim() {
                "1" => Span::styled("(x) 1  ( ) 0", MedicalTheme::text()),
                _ => Span::styled("( ) 1  (x) 0", MedicalTheme::text()),
            }
        } else if field.value.is_empty() {
            Span::styled(
                format!("{} (default)", field.def.format_value(field.def.default)),
                MedicalTheme::text_muted(),
            )
        } else {
            Span::styled(field.value.clone(), MedicalTheme::text())
        };

        lines.push(Line::from(vec![
            Span::styled(marker, MedicalTheme::focused()),
            Span::styled(format!("{:<label_width$}  ", field.def.label), label_style),
            value,
            if is_selected && !field.is_binary() {
                Span::styled("▌", MedicalTheme::cursor())
            } else {
                Span::raw("")
            },
        ]));

        if is_selected {
            lines.push(Line::from(Span::styled(
                format!("    {}", field.def.hint),
                MedicalTheme::text_muted(),
            )));
        }
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::collect;
    use crate::domain::PatientRecord;

    #[test]
    fn test_default_form_collects_defaults() {
        let form = SidebarForm::default();
        assert_eq!(form.fields.len(), FEATURES.len());
        assert_eq!(collect(&form).expect("valid"), PatientRecord::defaults());
    }

    #[test]
    fn test_typing_numeric_field() {
        let mut form = SidebarForm::default();
        assert!(form.clear_field());
        for c in "78".chars() {
            assert!(form.input_char(c));
        }
        assert!(!form.input_char('x'));
        assert_eq!(form.raw_value("admission_age"), Some("78"));
    }

    #[test]
    fn test_binary_field_selection() {
        let mut form = SidebarForm::default();
        form.selected_field = 9; // ventilator_flag
        assert!(!form.input_char('7'));
        assert!(form.input_char('1'));
        assert_eq!(form.raw_value("ventilator_flag"), Some("1"));
        assert!(form.toggle());
        assert_eq!(form.raw_value("ventilator_flag"), Some("0"));
        assert!(!form.delete_char());
    }

    #[test]
    fn test_navigation_wraps() {
        let mut form = SidebarForm::default();
        form.prev_field();
        assert_eq!(form.selected_field, FEATURES.len() - 1);
        form.next_field();
        assert_eq!(form.selected_field, 0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut form = SidebarForm::default();
        form.clear_field();
        form.input_char('9');
        form.error_message = Some("bad".into());
        form.reset();
        assert!(form.error_message.is_none());
        assert_eq!(form.raw_value("admission_age"), Some("65"));
    }
}
