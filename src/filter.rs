use thiserror::Error;

use crate::schema::{EducationForm, KNOWN_FORMS};

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("cannot use both --include and --exclude at the same time")]
    Conflicting,
    #[error("unknown education form '{0}' (expected one of SD, SMP, MI, MTs)")]
    UnknownForm(String),
}

/// Education forms currently shown on the map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSelection {
    forms: Vec<EducationForm>,
}

impl Default for FormSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl FormSelection {
    pub fn all() -> Self {
        Self {
            forms: KNOWN_FORMS.to_vec(),
        }
    }

    pub fn only(forms: &[EducationForm]) -> Self {
        let mut selection = Self { forms: Vec::new() };
        for form in forms {
            if !selection.contains(form) {
                selection.forms.push(form.clone());
            }
        }
        selection.sort();
        selection
    }

    pub fn contains(&self, form: &EducationForm) -> bool {
        self.forms.contains(form)
    }

    pub fn toggle(&mut self, form: &EducationForm) {
        if let Some(pos) = self.forms.iter().position(|f| f == form) {
            self.forms.remove(pos);
        } else {
            self.forms.push(form.clone());
            self.sort();
        }
    }

    pub fn forms(&self) -> &[EducationForm] {
        &self.forms
    }

    fn sort(&mut self) {
        self.forms.sort();
    }
}

fn parse_list(list: &[String]) -> Result<Vec<EducationForm>, FilterError> {
    list.iter()
        .map(|raw| EducationForm::parse_known(raw).ok_or_else(|| FilterError::UnknownForm(raw.clone())))
        .collect()
}

/// Resolves which education forms to draw based on include/exclude filters
pub fn resolve_forms(
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
) -> Result<FormSelection, FilterError> {
    match (include, exclude) {
        (Some(_), Some(_)) => Err(FilterError::Conflicting),
        (Some(include_list), None) => Ok(FormSelection::only(&parse_list(&include_list)?)),
        (None, Some(exclude_list)) => {
            let excluded = parse_list(&exclude_list)?;
            let kept: Vec<EducationForm> = KNOWN_FORMS
                .into_iter()
                .filter(|f| !excluded.contains(f))
                .collect();
            Ok(FormSelection::only(&kept))
        }
        (None, None) => Ok(FormSelection::all()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Option<Vec<String>> {
        Some(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_default_is_all_known() {
        let selection = resolve_forms(None, None).unwrap();
        assert_eq!(selection.forms(), &KNOWN_FORMS);
    }

    #[test]
    fn test_include() {
        let selection = resolve_forms(strings(&["mts", "sd"]), None).unwrap();
        assert_eq!(selection.forms(), &[EducationForm::Sd, EducationForm::Mts]);
    }

    #[test]
    fn test_exclude() {
        let selection = resolve_forms(None, strings(&["MI"])).unwrap();
        assert!(!selection.contains(&EducationForm::Mi));
        assert_eq!(selection.forms().len(), 3);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            resolve_forms(strings(&["SD"]), strings(&["MI"])),
            Err(FilterError::Conflicting)
        );
        assert_eq!(
            resolve_forms(strings(&["SMA"]), None),
            Err(FilterError::UnknownForm("SMA".to_string()))
        );
    }

    #[test]
    fn test_toggle_keeps_order() {
        let mut selection = FormSelection::all();
        selection.toggle(&EducationForm::Smp);
        assert!(!selection.contains(&EducationForm::Smp));
        selection.toggle(&EducationForm::Smp);
        assert_eq!(selection, FormSelection::all());
    }
}
