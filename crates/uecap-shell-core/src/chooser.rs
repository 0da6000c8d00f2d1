//! File chooser bridge.
//!
//! Maps a page's `<input type="file">` request onto the host's file picker
//! and the picker's answer back onto the list of URIs the page receives.

use url::Url;

/// Single or multiple selection, as requested by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChooserMode {
    #[default]
    Open,
    OpenMultiple,
}

/// What the page asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChooserParams {
    /// Value of the input's `accept` attribute, split; may contain blanks.
    pub accept_types: Vec<String>,
    pub mode: ChooserMode,
}

/// What is sent to the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRequest {
    /// Only set when at least one accept type is non-blank.
    pub mime_types: Option<Vec<String>>,
    pub allow_multiple: bool,
}

impl PickRequest {
    pub fn from_params(params: &ChooserParams) -> Self {
        let mime_types = params
            .accept_types
            .iter()
            .any(|t| !t.trim().is_empty())
            .then(|| params.accept_types.clone());
        Self {
            mime_types,
            allow_multiple: params.mode == ChooserMode::OpenMultiple,
        }
    }
}

/// The picker's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickResult {
    Cancelled,
    Picked {
        /// Multi-selection items, when the picker returned several.
        clip: Option<Vec<Url>>,
        /// Single selected item.
        data: Option<Url>,
    },
}

impl PickResult {
    /// URIs handed back to the page; `None` means nothing was chosen.
    pub fn into_uris(self) -> Option<Vec<Url>> {
        match self {
            PickResult::Cancelled => None,
            PickResult::Picked { clip: Some(items), .. } => Some(items),
            PickResult::Picked { clip: None, data } => data.map(|d| vec![d]),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PickerError {
    /// Nothing on the host can handle the pick request.
    #[error("no file picker available")]
    Unavailable,
}

/// Host capability that shows a file picker.
pub trait FilePicker {
    fn pick(&self, request: &PickRequest) -> Result<PickResult, PickerError>;
}

/// Runs the picker for `params`; an unavailable picker yields `None`.
pub fn choose_files(picker: &dyn FilePicker, params: &ChooserParams) -> Option<Vec<Url>> {
    let request = PickRequest::from_params(params);
    match picker.pick(&request) {
        Ok(result) => result.into_uris(),
        Err(e) => {
            tracing::warn!("file chooser: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FakePicker {
        answer: Result<PickResult, ()>,
        seen: RefCell<Option<PickRequest>>,
    }

    impl FilePicker for FakePicker {
        fn pick(&self, request: &PickRequest) -> Result<PickResult, PickerError> {
            *self.seen.borrow_mut() = Some(request.clone());
            self.answer.clone().map_err(|_| PickerError::Unavailable)
        }
    }

    fn picker(answer: Result<PickResult, ()>) -> FakePicker {
        FakePicker {
            answer,
            seen: RefCell::new(None),
        }
    }

    fn u(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn blank_accept_types_are_dropped() {
        let req = PickRequest::from_params(&ChooserParams {
            accept_types: vec!["".into(), " ".into()],
            mode: ChooserMode::Open,
        });
        assert_eq!(req.mime_types, None);
        assert!(!req.allow_multiple);
    }

    #[test]
    fn accept_types_and_multiple_forwarded() {
        let req = PickRequest::from_params(&ChooserParams {
            accept_types: vec!["".into(), "text/plain".into()],
            mode: ChooserMode::OpenMultiple,
        });
        assert_eq!(req.mime_types, Some(vec!["".to_string(), "text/plain".to_string()]));
        assert!(req.allow_multiple);
    }

    #[test]
    fn clip_items_win_over_data() {
        let r = PickResult::Picked {
            clip: Some(vec![u("content://a/1"), u("content://a/2")]),
            data: Some(u("content://a/0")),
        };
        assert_eq!(r.into_uris(), Some(vec![u("content://a/1"), u("content://a/2")]));
    }

    #[test]
    fn single_data_item() {
        let r = PickResult::Picked {
            clip: None,
            data: Some(u("file:///tmp/log.txt")),
        };
        assert_eq!(r.into_uris(), Some(vec![u("file:///tmp/log.txt")]));
        let empty = PickResult::Picked { clip: None, data: None };
        assert_eq!(empty.into_uris(), None);
        assert_eq!(PickResult::Cancelled.into_uris(), None);
    }

    #[test]
    fn choose_files_round_trip() {
        let p = picker(Ok(PickResult::Picked {
            clip: None,
            data: Some(u("file:///tmp/ue.bin")),
        }));
        let params = ChooserParams {
            accept_types: vec!["application/octet-stream".into()],
            mode: ChooserMode::Open,
        };
        assert_eq!(choose_files(&p, &params), Some(vec![u("file:///tmp/ue.bin")]));
        assert_eq!(
            p.seen.borrow().as_ref().and_then(|r| r.mime_types.clone()),
            Some(vec!["application/octet-stream".to_string()])
        );
    }

    #[test]
    fn unavailable_picker_yields_none() {
        let p = picker(Err(()));
        assert_eq!(choose_files(&p, &ChooserParams::default()), None);
    }
}
