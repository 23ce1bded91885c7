use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{image::Image, model::Embedding, setting::EncoderConfig, Error, Result};

/// Produces the embedding of the first face found in an image.
pub trait FaceEncoder {
    fn encode(&mut self, image: &Image) -> Result<Embedding>;
}

/// Decoded input images and the names derived from their files, in the
/// same order.
#[derive(Debug, Default)]
pub struct Sources {
    pub names: Vec<String>,
    pub images: Vec<Image>,
}

#[derive(Debug, Default)]
pub struct Encodings {
    pub names: Vec<String>,
    pub embeddings: Vec<Embedding>,
}

impl Sources {
    #[tracing::instrument(name = "Loading face images", err)]
    pub fn load(dir: &Path) -> Result<Self> {
        let mut sources = Self::default();
        for path in list_sources(dir)? {
            sources.images.push(Image::from_path(&path)?);
            sources.names.push(person_name(&path));
        }
        tracing::info!(count = sources.images.len(), "face images loaded");
        Ok(sources)
    }
}

/// Every regular file in `dir`, ordered by file name.
pub fn list_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)
        .map_err(Error::as_io_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<PathBuf>>>()
        .map_err(Error::as_io_error)?;
    paths.retain(|path| path.is_file());
    paths.sort();
    Ok(paths)
}

/// File name with its extension stripped.
pub fn person_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Encodes `images` in order. With `first_only` the run stops after the
/// first image, leaving every later image without an embedding.
pub fn find_encodings<E: FaceEncoder>(
    encoder: &mut E,
    images: &[Image],
    first_only: bool,
) -> Result<Vec<Embedding>> {
    let mut embeddings = Vec::with_capacity(images.len());
    for image in images {
        embeddings.push(encoder.encode(image)?);
        if first_only {
            break;
        }
    }

    let skipped = images.len() - embeddings.len();
    if skipped > 0 {
        tracing::warn!(
            skipped,
            "first_only is set, only the first image was encoded"
        );
    }
    Ok(embeddings)
}

/// Loads the faces directory, hands the derived names to `on_loaded`, then
/// encodes the images.
#[tracing::instrument(name = "Generating encodings", skip(encoder, on_loaded), err)]
pub fn run<E, F>(config: &EncoderConfig, encoder: &mut E, on_loaded: F) -> Result<Encodings>
where
    E: FaceEncoder,
    F: FnOnce(&[String]),
{
    let Sources { names, images } = Sources::load(&config.faces_dir)?;
    on_loaded(&names);
    let embeddings = find_encodings(encoder, &images, config.first_only)?;
    Ok(Encodings { names, embeddings })
}

#[cfg(test)]
mod test {
    use std::{fs, path::PathBuf};

    use super::{find_encodings, list_sources, person_name, run, FaceEncoder, Sources};
    use crate::{image::Image, model::Embedding, setting::EncoderConfig, Error, Result};

    /// Encodes an image as its mean pixel value, refusing all black images.
    #[derive(Default)]
    struct FakeEncoder {
        calls: usize,
    }

    impl FaceEncoder for FakeEncoder {
        fn encode(&mut self, image: &Image) -> Result<Embedding> {
            self.calls += 1;
            let sum: u64 = image.as_raw().iter().map(|&p| p as u64).sum();
            if sum == 0 {
                return Err(Error::NoFaceFound(image.path.clone()));
            }
            Ok(Embedding::from(vec![sum as f32 / image.as_raw().len() as f32]))
        }
    }

    fn faces_dir(name: &str, files: &[(&str, u8)]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("facecam_faces_{}", name));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("Failed to create faces dir");
        for (file, value) in files {
            image::RgbImage::from_pixel(4, 4, image::Rgb([*value; 3]))
                .save(dir.join(file))
                .expect("Failed to write test face");
        }
        dir
    }

    fn config(faces_dir: PathBuf, first_only: bool) -> EncoderConfig {
        EncoderConfig {
            faces_dir,
            first_only,
        }
    }

    #[test]
    fn derives_name_from_single_image() {
        let dir = faces_dir("single", &[("Ada Lovelace.png", 10)]);

        let encodings = run(&config(dir, true), &mut FakeEncoder::default(), |_| {})
            .expect("Failed to generate encodings");

        assert_eq!(encodings.names, vec!["Ada Lovelace".to_string()]);
        assert_eq!(encodings.embeddings.len(), 1);
    }

    #[test]
    fn encodes_only_first_image_when_first_only() {
        let dir = faces_dir("first_only", &[("b.png", 20), ("a.png", 10), ("c.png", 30)]);
        let mut encoder = FakeEncoder::default();

        let encodings = run(&config(dir, true), &mut encoder, |_| {}).expect("Failed to encode");

        assert_eq!(encodings.names, vec!["a", "b", "c"]);
        assert_eq!(encodings.embeddings.len(), 1);
        assert_eq!(encoder.calls, 1);
        assert_eq!(encodings.embeddings[0], Embedding::from(vec![10.]));
    }

    #[test]
    fn reports_names_before_encoding() {
        let dir = faces_dir("reported", &[("b.png", 20), ("a.png", 10)]);
        let mut reported = Vec::new();

        let encodings = run(&config(dir, true), &mut FakeEncoder::default(), |names| {
            reported = names.to_vec()
        })
        .expect("Failed to encode");

        assert_eq!(reported, vec!["a", "b"]);
        assert_eq!(reported, encodings.names);
    }

    #[test]
    fn reports_nothing_when_loading_fails() {
        let dir = faces_dir("unreported", &[("a.png", 10)]);
        fs::write(dir.join("notes.txt"), "hello").unwrap();
        let mut called = false;

        let res = run(&config(dir, true), &mut FakeEncoder::default(), |_| called = true);

        assert!(matches!(res, Err(Error::DecodeError(_, _))));
        assert!(!called);
    }

    #[test]
    fn encodes_every_image_without_first_only() {
        let dir = faces_dir("all", &[("a.png", 10), ("b.png", 20), ("c.png", 30)]);

        let encodings =
            run(&config(dir, false), &mut FakeEncoder::default(), |_| {}).expect("Failed to encode");

        assert_eq!(
            encodings.embeddings,
            vec![
                Embedding::from(vec![10.]),
                Embedding::from(vec![20.]),
                Embedding::from(vec![30.]),
            ]
        );
    }

    #[test]
    fn fails_when_no_face_is_found() {
        let dir = faces_dir("no_face", &[("blank.png", 0)]);

        let res = run(&config(dir.clone(), true), &mut FakeEncoder::default(), |_| {});

        match res {
            Err(Error::NoFaceFound(path)) => assert_eq!(path, dir.join("blank.png")),
            other => panic!("expected no face error, got {:?}", other),
        }
    }

    #[test]
    fn fails_on_undecodable_file() {
        let dir = faces_dir("undecodable", &[("a.png", 10)]);
        fs::write(dir.join("readme.txt"), "hello").unwrap();

        let res = Sources::load(&dir);

        assert!(matches!(res, Err(Error::DecodeError(p, _)) if p == dir.join("readme.txt")));
    }

    #[test]
    fn fails_on_missing_directory() {
        let dir = std::env::temp_dir().join("facecam_faces_does_not_exist");
        let _ = fs::remove_dir_all(&dir);

        assert!(matches!(list_sources(&dir), Err(Error::IoError(_))));
    }

    #[test]
    fn skips_nested_directories() {
        let dir = faces_dir("nested", &[("a.png", 10)]);
        fs::create_dir_all(dir.join("archive")).unwrap();

        assert_eq!(list_sources(&dir).unwrap(), vec![dir.join("a.png")]);
    }

    #[test]
    fn strips_only_last_extension() {
        assert_eq!(person_name(&PathBuf::from("faces/jane.doe.jpg")), "jane.doe");
        assert_eq!(person_name(&PathBuf::from("faces/noext")), "noext");
    }

    #[test]
    fn produces_nothing_for_empty_input() {
        let embeddings = find_encodings(&mut FakeEncoder::default(), &[], true).unwrap();
        assert!(embeddings.is_empty());
    }
}
