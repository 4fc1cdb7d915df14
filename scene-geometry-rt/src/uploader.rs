use ash::vk;
use bytemuck::Pod;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum UploadError {
	Vulkan { name: String, result: vk::Result },
	EmptyBuffer { name: String },
	/// the boundary returned fewer device buffers than were staged
	MissingBuffer { name: String },
}

impl Display for UploadError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			UploadError::Vulkan { name, result } => write!(f, "uploading buffer {name} failed: {result}"),
			UploadError::EmptyBuffer { name } => write!(f, "buffer {name} has no contents"),
			UploadError::MissingBuffer { name } => write!(f, "buffer {name} was staged but never flushed"),
		}
	}
}

impl std::error::Error for UploadError {}

/// A host visible staging buffer holding the contents for its device local twin.
#[derive(Debug)]
pub struct Staged<B> {
	pub name: String,
	pub usage: vk::BufferUsageFlags,
	pub size: u64,
	pub staging: B,
	pub device: B,
}

/// Whoever owns the Vulkan device: creates buffers, knows their device addresses and runs the transfer.
pub trait UploadBoundary {
	type Buffer;

	/// Creates a staging buffer filled with `bytes` and an uninitialized device local buffer of the same size with
	/// `usage`.
	fn create_staged_buffer(
		&self,
		name: &str,
		usage: vk::BufferUsageFlags,
		bytes: &[u8],
	) -> Result<Staged<Self::Buffer>, UploadError>;

	/// Only valid for buffers created with [`vk::BufferUsageFlags::SHADER_DEVICE_ADDRESS`].
	fn device_address_of(&self, buffer: &Self::Buffer) -> u64;

	/// Copies every staging buffer into its device buffer in one submission, blocks until the copy completed and
	/// releases the staging buffers. Returns the device buffers in staging order.
	fn copy_and_flush(&self, staged: Vec<Staged<Self::Buffer>>) -> Result<Vec<Self::Buffer>, UploadError>;
}

/// Index of a buffer staged in a [`StagingBatch`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Slot(usize);

/// Collects staged buffers so they can all be flushed at once.
pub struct StagingBatch<'a, U: UploadBoundary + ?Sized> {
	uploader: &'a U,
	staged: Vec<Staged<U::Buffer>>,
}

impl<'a, U: UploadBoundary + ?Sized> StagingBatch<'a, U> {
	pub fn new(uploader: &'a U) -> Self {
		Self {
			uploader,
			staged: Vec::new(),
		}
	}

	/// Stages `data` and returns its slot together with the device address of its future device buffer, or 0 if
	/// `usage` does not allow querying it.
	pub fn stage<T: Pod>(
		&mut self,
		name: &str,
		usage: vk::BufferUsageFlags,
		data: &[T],
	) -> Result<(Slot, u64), UploadError> {
		if data.is_empty() {
			return Err(UploadError::EmptyBuffer { name: name.to_string() });
		}
		let staged = self.uploader.create_staged_buffer(
			name,
			usage | vk::BufferUsageFlags::TRANSFER_DST,
			bytemuck::cast_slice(data),
		)?;
		let address = if usage.contains(vk::BufferUsageFlags::SHADER_DEVICE_ADDRESS) {
			self.uploader.device_address_of(&staged.device)
		} else {
			0
		};
		log::trace!("staged buffer {name} with {} bytes", staged.size);
		self.staged.push(staged);
		Ok((Slot(self.staged.len() - 1), address))
	}

	/// Like [`Self::stage`], but an empty `data` is skipped instead of being an error.
	pub fn stage_optional<T: Pod>(
		&mut self,
		name: &str,
		usage: vk::BufferUsageFlags,
		data: &[T],
	) -> Result<Option<(Slot, u64)>, UploadError> {
		if data.is_empty() {
			Ok(None)
		} else {
			self.stage(name, usage, data).map(Some)
		}
	}

	pub fn len(&self) -> usize {
		self.staged.len()
	}

	pub fn is_empty(&self) -> bool {
		self.staged.is_empty()
	}

	#[profiling::function]
	pub fn flush(self) -> Result<Flushed<U::Buffer>, UploadError> {
		let names = self.staged.iter().map(|s| s.name.clone()).collect::<Vec<_>>();
		let buffers = self.uploader.copy_and_flush(self.staged)?;
		let mut buffers = buffers.into_iter().map(Some).collect::<Vec<_>>();
		buffers.resize_with(names.len(), || None);
		Ok(Flushed { names, buffers })
	}
}

/// Device buffers after a flush, taken out by their [`Slot`].
pub struct Flushed<B> {
	names: Vec<String>,
	buffers: Vec<Option<B>>,
}

impl<B> Flushed<B> {
	pub fn take(&mut self, slot: Slot) -> Result<B, UploadError> {
		self.buffers
			.get_mut(slot.0)
			.and_then(Option::take)
			.ok_or_else(|| UploadError::MissingBuffer {
				name: self.names.get(slot.0).cloned().unwrap_or_default(),
			})
	}

	pub fn take_optional(&mut self, slot: Option<Slot>) -> Result<Option<B>, UploadError> {
		slot.map(|slot| self.take(slot)).transpose()
	}
}
