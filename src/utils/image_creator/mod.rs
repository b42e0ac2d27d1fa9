//! Client for the Bing Image Creator web flow.
//!
//! There is no official API: a prompt is posted with browser cookies, the
//! service redirects to a job page, and the finished result is scraped from an
//! HTML fragment. The flow is implemented once in [`protocol`] and exposed
//! through two clients:
//!
//! * [`ImageCreator`] for async callers on tokio.
//! * [`BlockingImageCreator`] for synchronous callers (`blocking` feature).
//!
//! Both return typed [`ImageCreatorError`]s and never retry on their own.

pub mod driver;
pub mod error;
pub mod extract;
pub mod persist;
pub mod protocol;
pub mod session;

use std::path::Path;

pub use error::{ImageCreatorError, ImageCreatorResult};
pub use extract::{PLACEHOLDER_IMAGES, extract_image_urls};
pub use persist::SavedFile;
pub use protocol::{GenerationJob, ImageGen, MAX_IMAGES};
pub use session::{Cookie, Credentials, ForwardedIp, SessionConfig};

use driver::AsyncDriver;
#[cfg(feature = "blocking")]
use driver::BlockingDriver;
use protocol::check_image_count;

/// Async image creator running on tokio.
pub type ImageCreator = ImageGen<AsyncDriver>;

impl ImageCreator {
    pub fn new(credentials: &Credentials, config: SessionConfig) -> ImageCreatorResult<Self> {
        let driver = AsyncDriver::new(&config, credentials)?;
        Ok(Self::with_driver(driver, config))
    }
}

/// Generates up to `max_images` images for `prompt` and saves them in `out_dir`.
pub async fn generate_images(
    prompt: &str,
    out_dir: impl AsRef<Path>,
    credentials: &Credentials,
    config: SessionConfig,
    max_images: usize,
) -> ImageCreatorResult<Vec<SavedFile>> {
    check_image_count(max_images)?;
    ImageCreator::new(credentials, config)?
        .generate(prompt, out_dir.as_ref(), max_images)
        .await
}

/// Synchronous image creator. Each call runs to completion on the calling
/// thread, including the sleeps between polls.
///
/// Must not be called from within an async runtime.
#[cfg(feature = "blocking")]
pub struct BlockingImageCreator {
    inner: ImageGen<BlockingDriver>,
}

#[cfg(feature = "blocking")]
impl BlockingImageCreator {
    pub fn new(credentials: &Credentials, config: SessionConfig) -> ImageCreatorResult<Self> {
        let driver = BlockingDriver::new(&config, credentials)?;
        Ok(Self {
            inner: ImageGen::with_driver(driver, config),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        self.inner.config()
    }

    pub fn submit(&self, prompt: &str) -> ImageCreatorResult<GenerationJob> {
        futures::executor::block_on(self.inner.submit(prompt))
    }

    pub fn poll(&self, job: &GenerationJob) -> ImageCreatorResult<String> {
        futures::executor::block_on(self.inner.poll(job))
    }

    pub fn get_images(&self, prompt: &str) -> ImageCreatorResult<Vec<String>> {
        futures::executor::block_on(self.inner.get_images(prompt))
    }

    pub fn save_images(
        &self,
        urls: &[String],
        out_dir: &Path,
        count: Option<usize>,
        file_prefix: Option<&str>,
    ) -> ImageCreatorResult<Vec<SavedFile>> {
        futures::executor::block_on(self.inner.save_images(urls, out_dir, count, file_prefix))
    }

    pub fn generate(
        &self,
        prompt: &str,
        out_dir: &Path,
        max_images: usize,
    ) -> ImageCreatorResult<Vec<SavedFile>> {
        futures::executor::block_on(self.inner.generate(prompt, out_dir, max_images))
    }
}

/// Blocking counterpart of [`generate_images`].
#[cfg(feature = "blocking")]
pub fn generate_images_blocking(
    prompt: &str,
    out_dir: impl AsRef<Path>,
    credentials: &Credentials,
    config: SessionConfig,
    max_images: usize,
) -> ImageCreatorResult<Vec<SavedFile>> {
    check_image_count(max_images)?;
    BlockingImageCreator::new(credentials, config)?.generate(prompt, out_dir.as_ref(), max_images)
}
