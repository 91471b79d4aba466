use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FileReader};

use crate::error::ServiceError;

fn reader_error(err: JsValue) -> ServiceError {
    ServiceError::Decode(format!("file read failed: {:?}", err))
}

/// Read a picked file as a `data:` URL
pub async fn read_as_data_url(file: &File) -> Result<String, ServiceError> {
    let reader = FileReader::new().map_err(reader_error)?;
    let done = js_sys::Promise::new(&mut |resolve, reject| {
        let loaded = reader.clone();
        let onload = Closure::once_into_js(move |_ev: web_sys::Event| {
            let result = loaded.result().unwrap_or(JsValue::NULL);
            let _ = resolve.call1(&JsValue::NULL, &result);
        });
        let onerror = Closure::once_into_js(move |_ev: web_sys::Event| {
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("reader error"));
        });
        reader.set_onload(Some(onload.unchecked_ref()));
        reader.set_onerror(Some(onerror.unchecked_ref()));
    });
    reader.read_as_data_url(file).map_err(reader_error)?;
    let value = JsFuture::from(done).await.map_err(reader_error)?;
    value
        .as_string()
        .ok_or_else(|| ServiceError::Decode("file reader returned no text".into()))
}
