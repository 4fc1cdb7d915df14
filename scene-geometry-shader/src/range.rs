use bytemuck_derive::{Pod, Zeroable};
use core::ops::Range;

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "disk", derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize))]
pub struct RangeU32 {
	pub start: u32,
	pub end: u32,
}

impl RangeU32 {
	pub fn new(start: u32, end: u32) -> Self {
		Self { start, end }
	}

	pub fn with_len(start: u32, len: u32) -> Self {
		Self::new(start, start + len)
	}

	pub fn len(&self) -> u32 {
		self.end - self.start
	}

	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	pub fn to_usize(&self) -> Range<usize> {
		self.start as usize..self.end as usize
	}
}

impl From<Range<u32>> for RangeU32 {
	fn from(value: Range<u32>) -> Self {
		Self {
			start: value.start,
			end: value.end,
		}
	}
}

impl From<RangeU32> for Range<u32> {
	fn from(value: RangeU32) -> Self {
		value.start..value.end
	}
}
