//! Ordered-dither lookup volumes.
//!
//! A stack of small tileable intensity matrices is expanded into a
//! `depth x height x width` single-channel volume. Slice `d` is filled from
//! `matrices[depth - d - 1]`, so the last matrix in the list ends up nearest
//! depth coordinate 0. Each matrix repeats across the plane: row `r % rows`,
//! column `c % row.len()` (rows may differ in length).

use crate::error::{AssetError, AssetResult};

/// One 2D tileable dither pattern, values in `[0, 1]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DitherMatrix {
    rows: Vec<Vec<f64>>,
}

impl DitherMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// 1x1 matrix holding a single value.
    pub fn solid(value: f64) -> Self {
        Self::new(vec![vec![value]])
    }

    /// Tiled lookup at output pixel `(r, c)`.
    #[inline]
    pub fn sample(&self, r: usize, c: usize) -> f64 {
        let row = &self.rows[r % self.rows.len()];
        row[c % row.len()]
    }

    fn validate(&self, index: usize) -> AssetResult<()> {
        if self.rows.is_empty() {
            return Err(AssetError::InvalidDither(format!(
                "matrix {} has no rows",
                index
            )));
        }
        if let Some(r) = self.rows.iter().position(Vec::is_empty) {
            return Err(AssetError::InvalidDither(format!(
                "matrix {} row {} is empty",
                index, r
            )));
        }
        Ok(())
    }
}

/// Intensity to byte: `round(v * 255)` clamped to `[0, 255]`; NaN maps to 0.
#[inline]
pub fn intensity_to_byte(value: f64) -> u8 {
    // `as` saturates and maps NaN to 0.
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// CPU-side dither volume, laid out `[d][r][c]` (x fastest).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DitherVolume {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub data: Vec<u8>,
}

impl DitherVolume {
    #[inline]
    pub fn slice_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Bytes of depth slice `d`, row-major.
    pub fn slice(&self, d: u32) -> &[u8] {
        let len = self.slice_len();
        let start = d as usize * len;
        &self.data[start..start + len]
    }

    #[inline]
    pub fn texel(&self, d: u32, r: u32, c: u32) -> u8 {
        self.data[d as usize * self.slice_len() + r as usize * self.width as usize + c as usize]
    }
}

/// Build the volume for a `width x height` plane from `matrices` (one slice each).
pub fn generate(width: u32, height: u32, matrices: &[DitherMatrix]) -> AssetResult<DitherVolume> {
    if width == 0 || height == 0 {
        return Err(AssetError::InvalidDither(format!(
            "target size {}x{} is empty",
            width, height
        )));
    }
    if matrices.is_empty() {
        return Err(AssetError::InvalidDither("no matrices given".into()));
    }
    for (i, m) in matrices.iter().enumerate() {
        m.validate(i)?;
    }

    let depth = matrices.len();
    let (w, h) = (width as usize, height as usize);
    let mut data = Vec::with_capacity(w * h * depth);

    for d in 0..depth {
        let matrix = &matrices[depth - d - 1];
        for r in 0..h {
            data.extend((0..w).map(|c| intensity_to_byte(matrix.sample(r, c))));
        }
    }

    log::debug!(
        "Generated dither volume {}x{}x{} ({} bytes)",
        width,
        height,
        depth,
        data.len()
    );

    Ok(DitherVolume {
        width,
        height,
        depth: depth as u32,
        data,
    })
}

/// The demo's pattern stack, sparsest first. Each pair of 6x6 layers repeats so
/// the linear filter between slices lands on a flat pattern.
pub fn builtin_stack() -> Vec<DitherMatrix> {
    let sparse = vec![
        vec![0.5, 1.0, 0.5, 0.0, 0.0, 0.0],
        vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0],
        vec![0.5, 1.0, 0.5, 0.0, 0.0, 0.0],
        vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    ];
    let mid = vec![
        vec![0.5, 1.0, 0.5, 0.5, 0.0, 0.5],
        vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0],
        vec![0.5, 1.0, 0.5, 0.5, 0.0, 0.5],
        vec![0.5, 0.0, 0.5, 0.5, 1.0, 0.5],
        vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
        vec![0.5, 0.0, 0.5, 0.5, 1.0, 0.5],
    ];
    let dense = vec![
        vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        vec![0.5, 0.0, 0.5, 1.0, 1.0, 1.0],
        vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
        vec![0.5, 0.0, 0.5, 1.0, 1.0, 1.0],
    ];

    vec![
        DitherMatrix::solid(0.0),
        DitherMatrix::new(sparse.clone()),
        DitherMatrix::new(sparse),
        DitherMatrix::new(mid.clone()),
        DitherMatrix::new(mid),
        DitherMatrix::new(dense.clone()),
        DitherMatrix::new(dense),
        DitherMatrix::solid(1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> DitherMatrix {
        DitherMatrix::new(vec![vec![0.0, 1.0], vec![1.0, 0.0]])
    }

    #[test]
    fn byte_conversion_rounds_and_clamps() {
        assert_eq!(intensity_to_byte(0.0), 0);
        assert_eq!(intensity_to_byte(1.0), 255);
        assert_eq!(intensity_to_byte(0.5), 128);
        assert_eq!(intensity_to_byte(-3.0), 0);
        assert_eq!(intensity_to_byte(7.0), 255);
        assert_eq!(intensity_to_byte(f64::NAN), 0);
    }

    #[test]
    fn solid_matrix_fills_whole_slice() {
        let vol = generate(13, 7, &[DitherMatrix::solid(0.2)]).expect("generate");
        let expected = intensity_to_byte(0.2);
        assert_eq!(expected, 51);
        assert!(vol.slice(0).iter().all(|&b| b == expected));
        assert_eq!(vol.data.len(), 13 * 7);
    }

    #[test]
    fn slices_are_stacked_in_reverse() {
        let first = DitherMatrix::solid(0.0);
        let last = checker();
        let vol = generate(4, 4, &[first, DitherMatrix::solid(0.5), last]).expect("generate");
        assert_eq!(vol.depth, 3);
        assert_eq!(vol.slice(0), &[0, 255, 0, 255, 255, 0, 255, 0, 0, 255, 0, 255, 255, 0, 255, 0]);
        assert!(vol.slice(1).iter().all(|&b| b == 128));
        assert!(vol.slice(2).iter().all(|&b| b == 0));
    }

    #[test]
    fn columns_tile_by_row_length() {
        let m = DitherMatrix::new(vec![
            vec![0.0, 0.2, 0.4],
            vec![1.0, 0.8],
        ]);
        let vol = generate(11, 5, &[m]).expect("generate");
        for r in 0..5 {
            let len = if r % 2 == 0 { 3 } else { 2 };
            for c in 0..(11 - len) {
                assert_eq!(vol.texel(0, r, c), vol.texel(0, r, c + len), "r={r} c={c}");
            }
        }
        assert_eq!(vol.texel(0, 1, 1), intensity_to_byte(0.8));
        assert_eq!(vol.texel(0, 2, 2), intensity_to_byte(0.4));
    }

    #[test]
    fn regeneration_is_byte_identical() {
        let stack = builtin_stack();
        let a = generate(64, 48, &stack).expect("generate");
        let b = generate(64, 48, &stack).expect("generate");
        assert_eq!(a, b);
    }

    #[test]
    fn builtin_stack_runs_dark_to_bright_from_the_back() {
        let stack = builtin_stack();
        assert_eq!(stack.len(), 8);
        let vol = generate(12, 12, &stack).expect("generate");
        assert!(vol.slice(0).iter().all(|&b| b == 255));
        assert!(vol.slice(7).iter().all(|&b| b == 0));
        assert_eq!(vol.slice(1), vol.slice(2));
    }

    #[test]
    fn rejects_empty_inputs() {
        assert!(generate(0, 4, &[DitherMatrix::solid(1.0)]).is_err());
        assert!(generate(4, 4, &[]).is_err());
        assert!(generate(4, 4, &[DitherMatrix::new(vec![])]).is_err());
        let err = generate(4, 4, &[DitherMatrix::new(vec![vec![1.0], vec![]])]).unwrap_err();
        assert!(matches!(err, AssetError::InvalidDither(_)));
    }
}
