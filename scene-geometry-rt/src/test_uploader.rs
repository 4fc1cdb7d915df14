//! An [`UploadBoundary`] backed by host memory, handing out fake device addresses.

use crate::uploader::{Staged, UploadBoundary, UploadError};
use ash::vk;
use std::cell::Cell;

#[derive(Debug)]
pub struct HostBuffer {
	pub name: String,
	pub usage: vk::BufferUsageFlags,
	pub address: u64,
	pub bytes: Vec<u8>,
}

impl HostBuffer {
	pub fn read<T: bytemuck::Pod>(&self) -> Vec<T> {
		self.bytes
			.chunks_exact(size_of::<T>())
			.map(bytemuck::pod_read_unaligned)
			.collect()
	}
}

pub struct HostUploader {
	pub next_address: Cell<u64>,
	pub flushes: Cell<u32>,
	/// lose the last staged buffer on flush
	pub drop_last: bool,
}

impl Default for HostUploader {
	fn default() -> Self {
		Self {
			next_address: Cell::new(0x10000),
			flushes: Cell::new(0),
			drop_last: false,
		}
	}
}

impl UploadBoundary for HostUploader {
	type Buffer = HostBuffer;

	fn create_staged_buffer(
		&self,
		name: &str,
		usage: vk::BufferUsageFlags,
		bytes: &[u8],
	) -> Result<Staged<HostBuffer>, UploadError> {
		let address = self.next_address.get();
		self.next_address.set(address + (bytes.len() as u64).next_multiple_of(256));
		Ok(Staged {
			name: name.to_string(),
			usage,
			size: bytes.len() as u64,
			staging: HostBuffer {
				name: format!("{name} staging"),
				usage: vk::BufferUsageFlags::TRANSFER_SRC,
				address: 0,
				bytes: bytes.to_vec(),
			},
			device: HostBuffer {
				name: name.to_string(),
				usage,
				address,
				bytes: vec![0; bytes.len()],
			},
		})
	}

	fn device_address_of(&self, buffer: &HostBuffer) -> u64 {
		assert!(
			buffer.usage.contains(vk::BufferUsageFlags::SHADER_DEVICE_ADDRESS),
			"buffer {} has no device address",
			buffer.name
		);
		buffer.address
	}

	fn copy_and_flush(&self, mut staged: Vec<Staged<HostBuffer>>) -> Result<Vec<HostBuffer>, UploadError> {
		self.flushes.set(self.flushes.get() + 1);
		if self.drop_last {
			staged.pop();
		}
		Ok(staged
			.into_iter()
			.map(|s| {
				let mut device = s.device;
				device.bytes.copy_from_slice(&s.staging.bytes);
				device
			})
			.collect())
	}
}
