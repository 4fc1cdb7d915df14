pub mod acceleration;
pub mod descriptor;
pub mod error;
pub mod scene;
pub mod uploader;

#[cfg(test)]
mod test_scene;
#[cfg(test)]
mod test_uploader;
