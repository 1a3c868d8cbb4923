use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use crate::config::CrossOrigin;
use crate::detect::image::ImageFormat;

/// A single load as handed to an [`ImageSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub url: String,
    /// `None` when cross-origin mode is disabled for the batch.
    pub cross_origin: Option<CrossOrigin>,
}

/// Handle to a successfully loaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub url: String,
    pub cross_origin: Option<CrossOrigin>,
    pub content_type: Option<String>,
    pub format: ImageFormat,
    pub data: Bytes,
}

impl LoadedImage {
    /// A handle with no payload, for sources that only confirm reachability.
    pub fn empty(request: &LoadRequest) -> Self {
        Self {
            url: request.url.clone(),
            cross_origin: request.cross_origin,
            content_type: None,
            format: ImageFormat::Unknown,
            data: Bytes::new(),
        }
    }
}

/// The fetch primitive: resolves with a loaded image or fails.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn load(&self, request: &LoadRequest) -> Result<LoadedImage>;
}

/// The identifiers of one batch, accepted as a single url or as any list of urls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageList(Vec<String>);

impl ImageList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for ImageList {
    fn from(url: &str) -> Self {
        Self(vec![url.to_string()])
    }
}

impl From<String> for ImageList {
    fn from(url: String) -> Self {
        Self(vec![url])
    }
}

impl From<Vec<String>> for ImageList {
    fn from(urls: Vec<String>) -> Self {
        Self(urls)
    }
}

impl From<Vec<&str>> for ImageList {
    fn from(urls: Vec<&str>) -> Self {
        urls.into_iter().collect()
    }
}

impl From<&[String]> for ImageList {
    fn from(urls: &[String]) -> Self {
        Self(urls.to_vec())
    }
}

impl From<&[&str]> for ImageList {
    fn from(urls: &[&str]) -> Self {
        urls.iter().copied().collect()
    }
}

impl<const N: usize> From<[&str; N]> for ImageList {
    fn from(urls: [&str; N]) -> Self {
        urls.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ImageList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_list_single_or_many() {
        assert_eq!(ImageList::from("a.png").into_vec(), vec!["a.png"]);
        assert_eq!(ImageList::from(["a.png", "b.png"]).len(), 2);
        assert!(ImageList::from(Vec::<String>::new()).is_empty());

        let dup: ImageList = ["x.png", "x.png"].into();
        assert_eq!(dup.into_vec(), vec!["x.png", "x.png"]);
    }
}
