use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, File, FileReader};
use yew::Callback;

use crate::state::field_editor::{validate_image_file, UploadError};

/// Validate a picked image and read it into a `data:` URL. The result is
/// delivered through `on_done` once the browser has read the file.
pub fn read_image_as_data_url(file: File, on_done: Callback<Result<String, UploadError>>) {
    if let Err(e) = validate_image_file(&file.type_(), file.size()) {
        log::warn!("Rejected upload {}: {}", file.name(), e);
        on_done.emit(Err(e));
        return;
    }

    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(_) => {
            on_done.emit(Err(UploadError::Read("FileReader unavailable".into())));
            return;
        }
    };

    let reader_clone = reader.clone();
    let done = on_done.clone();
    let onload: Closure<dyn FnMut(Event)> = Closure::once(move |_event: Event| {
        let result = reader_clone
            .result()
            .ok()
            .and_then(|value| value.as_string())
            .ok_or_else(|| UploadError::Read("empty result".into()));
        done.emit(result);
    });
    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();

    if reader.read_as_data_url(&file).is_err() {
        on_done.emit(Err(UploadError::Read(file.name())));
    }
}
