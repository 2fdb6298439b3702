use thiserror::Error;

use crate::config::MAX_IMAGE_BYTES;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldMode {
    Display,
    Editing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Commit,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlurAction {
    Ignore,
    Commit,
}

/// Value change produced by a commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldEdit {
    pub old_value: String,
    pub new_value: String,
}

/// Display/editing state of a single editable field.
///
/// `original` is captured when editing begins; a commit only yields an edit
/// when the draft differs from it. Action buttons call `arm_button` on
/// mousedown, which fires before the input's blur, so the blur handler
/// leaves the commit to the button's click handler.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldEditor {
    mode: FieldMode,
    multiline: bool,
    original: String,
    draft: String,
    button_armed: bool,
}

impl FieldEditor {
    pub fn new(multiline: bool) -> Self {
        Self {
            mode: FieldMode::Display,
            multiline,
            original: String::new(),
            draft: String::new(),
            button_armed: false,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.mode == FieldMode::Editing
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Enter editing pre-populated with `current`. No-op without permission.
    pub fn begin(&mut self, current: &str, can_edit: bool) -> bool {
        if !can_edit || self.is_editing() {
            return false;
        }
        self.mode = FieldMode::Editing;
        self.original = current.to_string();
        self.draft = current.to_string();
        self.button_armed = false;
        true
    }

    pub fn set_draft(&mut self, value: impl Into<String>) {
        if self.is_editing() {
            self.draft = value.into();
        }
    }

    pub fn on_key(&self, key: &str, ctrl_or_meta: bool) -> KeyAction {
        if !self.is_editing() {
            return KeyAction::None;
        }
        match key {
            "Escape" => KeyAction::Cancel,
            "Enter" if !self.multiline || ctrl_or_meta => KeyAction::Commit,
            _ => KeyAction::None,
        }
    }

    pub fn arm_button(&mut self) {
        if self.is_editing() {
            self.button_armed = true;
        }
    }

    pub fn on_blur(&self) -> BlurAction {
        if self.is_editing() && !self.button_armed {
            BlurAction::Commit
        } else {
            BlurAction::Ignore
        }
    }

    pub fn commit(&mut self) -> Option<FieldEdit> {
        if !self.is_editing() {
            return None;
        }
        self.mode = FieldMode::Display;
        self.button_armed = false;
        if self.draft == self.original {
            return None;
        }
        Some(FieldEdit {
            old_value: self.original.clone(),
            new_value: self.draft.clone(),
        })
    }

    /// Commit for image fields. An untouched source commits as a no-op even
    /// when it is empty; a changed one must be a valid image URL, otherwise
    /// the editor stays open with the draft as typed.
    pub fn commit_image(&mut self) -> Result<Option<FieldEdit>, UploadError> {
        if !self.is_editing() {
            return Ok(None);
        }
        if self.draft != self.original {
            self.draft = validate_image_url(&self.draft)?;
        }
        Ok(self.commit())
    }

    pub fn cancel(&mut self) {
        self.mode = FieldMode::Display;
        self.draft = self.original.clone();
        self.button_armed = false;
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UploadError {
    #[error("Only image files can be uploaded (got {0})")]
    NotAnImage(String),

    #[error("Image is too large ({size_mb:.1} MB, max 5 MB)")]
    TooLarge { size_mb: f64 },

    #[error("Please enter an image URL")]
    EmptyUrl,

    #[error("Image URL must start with http://, https://, / or data:image/")]
    InvalidUrl,

    #[error("Could not read file: {0}")]
    Read(String),
}

/// Checks run on a picked file before it is read into a data URL.
pub fn validate_image_file(mime_type: &str, size_bytes: f64) -> Result<(), UploadError> {
    if !mime_type.starts_with("image/") {
        return Err(UploadError::NotAnImage(if mime_type.is_empty() {
            "unknown type".to_string()
        } else {
            mime_type.to_string()
        }));
    }
    if size_bytes > MAX_IMAGE_BYTES {
        return Err(UploadError::TooLarge {
            size_mb: size_bytes / (1024.0 * 1024.0),
        });
    }
    Ok(())
}

pub fn validate_image_url(url: &str) -> Result<String, UploadError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(UploadError::EmptyUrl);
    }
    let allowed = ["http://", "https://", "/", "data:image/"];
    if allowed.iter().any(|prefix| url.starts_with(prefix)) {
        Ok(url.to_string())
    } else {
        Err(UploadError::InvalidUrl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_prepopulates_with_current_value() {
        let mut editor = FieldEditor::new(false);
        assert!(editor.begin("Learn to trade", true));
        assert!(editor.is_editing());
        assert_eq!(editor.draft(), "Learn to trade");
    }

    #[test]
    fn begin_requires_permission() {
        let mut editor = FieldEditor::new(false);
        assert!(!editor.begin("Learn to trade", false));
        assert!(!editor.is_editing());
    }

    #[test]
    fn escape_cancels_without_edit() {
        let mut editor = FieldEditor::new(false);
        editor.begin("V", true);
        editor.set_draft("something else");
        assert_eq!(editor.on_key("Escape", false), KeyAction::Cancel);
        editor.cancel();
        assert!(!editor.is_editing());
        assert_eq!(editor.draft(), "V");
        assert_eq!(editor.commit(), None);
    }

    #[test]
    fn enter_commits_single_line_only() {
        let mut single = FieldEditor::new(false);
        single.begin("a", true);
        assert_eq!(single.on_key("Enter", false), KeyAction::Commit);

        let mut multi = FieldEditor::new(true);
        multi.begin("a", true);
        assert_eq!(multi.on_key("Enter", false), KeyAction::None);
        assert_eq!(multi.on_key("Enter", true), KeyAction::Commit);
        assert_eq!(multi.on_key("a", false), KeyAction::None);
    }

    #[test]
    fn commit_reports_only_real_changes() {
        let mut editor = FieldEditor::new(false);
        editor.begin("old", true);
        assert_eq!(editor.commit(), None);

        editor.begin("old", true);
        editor.set_draft("new");
        assert_eq!(
            editor.commit(),
            Some(FieldEdit { old_value: "old".into(), new_value: "new".into() })
        );
        assert!(!editor.is_editing());
        // Drafts are ignored outside editing
        editor.set_draft("ignored");
        assert_eq!(editor.commit(), None);
    }

    #[test]
    fn armed_button_suppresses_blur_commit() {
        let mut editor = FieldEditor::new(true);
        editor.begin("old", true);
        assert_eq!(editor.on_blur(), BlurAction::Commit);

        editor.arm_button();
        assert_eq!(editor.on_blur(), BlurAction::Ignore);
        editor.cancel();
        assert_eq!(editor.on_blur(), BlurAction::Ignore);

        editor.begin("old", true);
        assert_eq!(editor.on_blur(), BlurAction::Commit);
    }

    #[test]
    fn rejects_non_images_regardless_of_size() {
        for size in [0.0, 10.0, MAX_IMAGE_BYTES * 2.0] {
            assert_eq!(
                validate_image_file("text/plain", size),
                Err(UploadError::NotAnImage("text/plain".into()))
            );
        }
        assert!(matches!(validate_image_file("", 1.0), Err(UploadError::NotAnImage(_))));
    }

    #[test]
    fn rejects_images_over_five_megabytes() {
        assert_eq!(validate_image_file("image/png", MAX_IMAGE_BYTES), Ok(()));
        assert!(matches!(
            validate_image_file("image/jpeg", MAX_IMAGE_BYTES + 1.0),
            Err(UploadError::TooLarge { .. })
        ));
    }

    #[test]
    fn image_urls() {
        assert_eq!(validate_image_url("  https://cdn.example.com/a.png "), Ok("https://cdn.example.com/a.png".into()));
        assert_eq!(validate_image_url("/media/hero.jpg"), Ok("/media/hero.jpg".into()));
        assert_eq!(validate_image_url(""), Err(UploadError::EmptyUrl));
        assert_eq!(validate_image_url("javascript:alert(1)"), Err(UploadError::InvalidUrl));
    }

    #[test]
    fn unchanged_empty_image_confirms_quietly() {
        let mut editor = FieldEditor::new(false);
        editor.begin("", true);
        assert_eq!(editor.commit_image(), Ok(None));
        assert!(!editor.is_editing());
    }

    #[test]
    fn changed_image_must_be_a_valid_url() {
        let mut editor = FieldEditor::new(false);
        editor.begin("/assets/hero.jpg", true);
        editor.set_draft("hero.jpg");
        assert_eq!(editor.commit_image(), Err(UploadError::InvalidUrl));
        assert!(editor.is_editing());
        assert_eq!(editor.draft(), "hero.jpg");

        editor.set_draft("  https://cdn.example.com/hero.png ");
        assert_eq!(
            editor.commit_image(),
            Ok(Some(FieldEdit {
                old_value: "/assets/hero.jpg".into(),
                new_value: "https://cdn.example.com/hero.png".into(),
            }))
        );
        assert!(!editor.is_editing());
    }
}
