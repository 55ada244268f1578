use super::ConfigError;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use ndarray::{Array1, ArrayView1, ArrayViewMut1};

/// Adapter trait for reading contiguous 1D input.
pub trait Read1D<T> {
    /// Borrow the underlying input as a contiguous slice.
    fn read_slice(&self) -> Result<&[T], ConfigError>;
}

/// Adapter trait for writing contiguous 1D output.
pub trait Write1D<T> {
    /// Borrow the underlying output as a mutable contiguous slice.
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError>;
}

impl<T> Read1D<T> for [T] {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        Ok(self)
    }
}

impl<T> Write1D<T> for [T] {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        Ok(self)
    }
}

impl<T, const N: usize> Read1D<T> for [T; N] {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        Ok(self)
    }
}

impl<T, const N: usize> Write1D<T> for [T; N] {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        Ok(self)
    }
}

#[cfg(feature = "alloc")]
impl<T> Read1D<T> for Vec<T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        Ok(self.as_slice())
    }
}

#[cfg(feature = "alloc")]
impl<T> Write1D<T> for Vec<T> {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        Ok(self.as_mut_slice())
    }
}

impl<T> Read1D<T> for Array1<T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        self.as_slice()
            .ok_or(ConfigError::NonContiguous { arg: "array" })
    }
}

impl<T> Write1D<T> for Array1<T> {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        self.as_slice_mut()
            .ok_or(ConfigError::NonContiguous { arg: "array" })
    }
}

impl<'a, T> Read1D<T> for ArrayView1<'a, T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        self.as_slice()
            .ok_or(ConfigError::NonContiguous { arg: "array_view" })
    }
}

impl<'a, T> Write1D<T> for ArrayViewMut1<'a, T> {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        self.as_slice_mut().ok_or(ConfigError::NonContiguous {
            arg: "array_view_mut",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Read1D, Write1D};
    use crate::kernel::ConfigError;
    use ndarray::{s, Array1};

    #[test]
    fn impulse_response_sources_read_as_slices() {
        let h = [1.0f64, 1.4, 1.06, 0.674];
        assert_eq!(h.read_slice().expect("array adapter").len(), 4);

        let v = h.to_vec();
        assert_eq!(v.read_slice().expect("vec adapter")[1], 1.4);

        let arr = Array1::from(v.clone());
        assert_eq!(arr.read_slice().expect("array1 adapter")[3], 0.674);
    }

    #[test]
    fn coefficient_buffers_write_in_place() {
        let mut b = vec![0.0f64; 2];
        b.write_slice_mut()
            .expect("vec write adapter")
            .copy_from_slice(&[1.0, 0.5]);
        assert_eq!(b, vec![1.0, 0.5]);
    }

    #[test]
    fn strided_views_are_rejected() {
        let arr = Array1::from(vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let every_other = arr.slice(s![..;2]);
        assert_eq!(
            every_other.read_slice(),
            Err(ConfigError::NonContiguous { arg: "array_view" })
        );
    }
}
