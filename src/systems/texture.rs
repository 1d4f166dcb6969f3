use anyhow::Context;
use futures_channel::oneshot;
use image::RgbaImage;

type LoadResult = anyhow::Result<RgbaImage>;

/// Fetches and decodes an image off the frame loop. The frame loop calls
/// `poll` once per frame and gets the result exactly once.
pub struct TextureLoader {
    receiver: Option<oneshot::Receiver<LoadResult>>,
}

impl TextureLoader {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn spawn(path: &str) -> Self {
        let (sender, receiver) = oneshot::channel();
        let path = path.to_owned();

        // if the thread can't start, the sender is dropped and poll reports it
        if let Err(err) = std::thread::Builder::new()
            .name("texture-loader".into())
            .spawn(move || {
                let _ = sender.send(load_from_path(&path));
            })
        {
            tracing::error!("Could not start texture loader: {err}");
        }

        Self {
            receiver: Some(receiver),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn spawn(url: &str) -> Self {
        let (sender, receiver) = oneshot::channel();
        let url = url.to_owned();

        wasm_bindgen_futures::spawn_local(async move {
            let result = fetch_bytes(&url)
                .await
                .and_then(|bytes| decode(&bytes))
                .with_context(|| format!("loading {url}"));
            let _ = sender.send(result);
        });

        Self {
            receiver: Some(receiver),
        }
    }

    /// `None` while the load is in flight and after the result was taken.
    pub fn poll(&mut self) -> Option<LoadResult> {
        let receiver = self.receiver.as_mut()?;
        let result = match receiver.try_recv() {
            Ok(None) => return None,
            Ok(Some(result)) => result,
            Err(oneshot::Canceled) => Err(anyhow::anyhow!("texture loader stopped before finishing")),
        };
        self.receiver = None;
        Some(result)
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.receiver.is_some()
    }
}

pub fn decode(bytes: &[u8]) -> LoadResult {
    let image = image::load_from_memory(bytes).context("decoding texture")?;
    Ok(image.to_rgba8())
}

#[cfg(not(target_arch = "wasm32"))]
fn load_from_path(path: &str) -> LoadResult {
    let bytes = std::fs::read(path).with_context(|| format!("reading {path}"))?;
    decode(&bytes).with_context(|| format!("loading {path}"))
}

#[cfg(target_arch = "wasm32")]
async fn fetch_bytes(url: &str) -> anyhow::Result<Vec<u8>> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let window = web_sys::window().context("no window")?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_error)?;
    let response: web_sys::Response = response.dyn_into().map_err(js_error)?;
    if !response.ok() {
        anyhow::bail!("HTTP {}", response.status());
    }

    let buffer = JsFuture::from(response.array_buffer().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[cfg(target_arch = "wasm32")]
fn js_error(value: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow::anyhow!("{value:?}")
}
