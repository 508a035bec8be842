//! Rigid 4x4 pose transforms stored next to each template.
//!
//! Pose files are plain text holding 16 numbers in row-major order separated
//! by any whitespace, which is the layout Eigen's stream output writes.

use crate::util::{PoseMatchError, PoseMatchResult};
use nalgebra::{Matrix3, Matrix4, Vector3};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Object pose (rotation and translation) of a rendered template.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    m: Matrix4<f32>,
}

impl Pose {
    pub fn new(m: Matrix4<f32>) -> Self {
        Self { m }
    }

    pub fn identity() -> Self {
        Self::new(Matrix4::identity())
    }

    pub fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        let flat: Vec<f32> = rows.iter().flatten().copied().collect();
        Self::new(Matrix4::from_row_slice(&flat))
    }

    pub fn to_rows(&self) -> [[f32; 4]; 4] {
        let mut rows = [[0.0f32; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = self.m[(r, c)];
            }
        }
        rows
    }

    pub fn matrix(&self) -> &Matrix4<f32> {
        &self.m
    }

    /// Upper-left 3x3 block.
    pub fn rotation(&self) -> Matrix3<f32> {
        self.m.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// First three entries of the last column.
    pub fn translation(&self) -> Vector3<f32> {
        self.m.fixed_view::<3, 1>(0, 3).into_owned()
    }
}

impl FromStr for Pose {
    type Err = PoseMatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values = Vec::with_capacity(16);
        for token in s.split_whitespace() {
            let value: f32 = token.parse().map_err(|_| PoseMatchError::PoseParse {
                reason: format!("invalid number {token:?}"),
            })?;
            if !value.is_finite() {
                return Err(PoseMatchError::PoseParse {
                    reason: format!("non-finite value {token:?}"),
                });
            }
            values.push(value);
        }
        if values.len() != 16 {
            return Err(PoseMatchError::PoseParse {
                reason: format!("expected 16 values, found {}", values.len()),
            });
        }
        Ok(Self::new(Matrix4::from_row_slice(&values)))
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..4 {
            if r > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{:>10} {:>10} {:>10} {:>10}",
                self.m[(r, 0)],
                self.m[(r, 1)],
                self.m[(r, 2)],
                self.m[(r, 3)]
            )?;
        }
        Ok(())
    }
}

/// Reads a pose file from disk.
pub fn load_pose<P: AsRef<Path>>(path: P) -> PoseMatchResult<Pose> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|err| PoseMatchError::PoseIo {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    text.parse()
}

#[cfg(test)]
mod tests {
    use super::Pose;
    use crate::util::PoseMatchError;

    #[test]
    fn parses_eigen_stream_layout() {
        let text = "  1 0 0 0.5\n0 1 0 -2\n0 0 1 3.25\n0 0 0 1\n";
        let pose: Pose = text.parse().unwrap();
        assert_eq!(pose.translation().as_slice(), &[0.5, -2.0, 3.25]);
        assert_eq!(pose.rotation(), nalgebra::Matrix3::identity());
        assert_eq!(pose.to_rows()[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn rejects_short_and_garbled_input() {
        let err = "1 2 3".parse::<Pose>().err().unwrap();
        assert_eq!(
            err,
            PoseMatchError::PoseParse {
                reason: "expected 16 values, found 3".to_string(),
            }
        );
        assert!("1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 x".parse::<Pose>().is_err());
        assert!("1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 NaN".parse::<Pose>().is_err());
    }

    #[test]
    fn display_round_trips() {
        let pose = Pose::from_rows([
            [0.0, -1.0, 0.0, 10.0],
            [1.0, 0.0, 0.0, 20.0],
            [0.0, 0.0, 1.0, 30.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let parsed: Pose = pose.to_string().parse().unwrap();
        assert_eq!(parsed, pose);
    }
}
