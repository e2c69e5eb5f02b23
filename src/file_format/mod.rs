pub mod coco;
pub mod imagenet;
pub mod openimages;
pub mod taxonomy_json;
pub mod wnid;
