//! Illustration for drafted books.

pub mod image;

pub use image::{
    decode_data_uri, encode_data_uri, image_prompt, split_data_uri, to_data_uri, ImageService,
};
