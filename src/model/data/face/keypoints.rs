use nalgebra::{Matrix2, Matrix3, SMatrix, Vector2};

use crate::math::Math;

pub const KEY_POINTS_LEN: usize = 5;

/// Canonical landmark positions of a 112 x 112 ArcFace crop.
pub const ARC_FACE_DST: KeyPoints = KeyPoints([
    [38.2946, 51.6963],
    [73.5318, 51.5014],
    [56.0252, 71.7366],
    [41.5493, 92.3655],
    [70.7299, 92.2041],
]);

/// Eyes, nose and mouth corners as (x, y).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPoints(pub [[f32; 2]; KEY_POINTS_LEN]);

impl KeyPoints {
    pub fn mean(&self) -> [f32; 2] {
        Math::mean(self.0)
    }

    pub fn scale(&self, factor: f32) -> Self {
        Self(self.0.map(|[x, y]| [x * factor, y * factor]))
    }

    fn centered(&self) -> SMatrix<f32, 2, KEY_POINTS_LEN> {
        let centroid = Math::centroid_matrix(self.0);
        SMatrix::<f32, 2, KEY_POINTS_LEN>::from_fn(|r, c| centroid[c][r])
    }

    /// Least squares similarity transform (rotation, uniform scale,
    /// translation) taking `self` onto `dst`, as a homogeneous 3x3 matrix.
    /// `None` when the points are degenerate.
    pub fn umeyama(&self, dst: &Self) -> Option<Matrix3<f32>> {
        let (src_mean, dst_mean) = (self.mean(), dst.mean());
        let (src_dmean, dst_dmean) = (self.centered(), dst.centered());

        let a: Matrix2<f32> = dst_dmean * src_dmean.transpose() / KEY_POINTS_LEN as f32;

        let mut d = Vector2::new(1f32, 1.);
        if a.determinant() < 0. {
            d.y = -1.;
        }

        let svd = a.svd(true, true);
        let rank = svd.rank(1e-5);
        let (u, v_t, s) = (svd.u?, svd.v_t?, svd.singular_values);

        let t = match rank {
            0 => return None,
            1 if u.determinant() * v_t.determinant() > 0. => u * v_t,
            1 => u * Matrix2::from_diagonal(&Vector2::new(d.x, -1.)) * v_t,
            _ => u * Matrix2::from_diagonal(&d) * v_t,
        };

        let src_var: f32 = Math::variance(self.0).iter().sum();
        if src_var == 0. {
            return None;
        }
        let scale = s.dot(&d) / src_var;

        let shift = Vector2::new(dst_mean[0], dst_mean[1])
            - scale * (t * Vector2::new(src_mean[0], src_mean[1]));
        let r = t * scale;

        Some(Matrix3::new(
            r.m11, r.m12, shift.x, //
            r.m21, r.m22, shift.y, //
            0., 0., 1.,
        ))
    }

    /// Transform onto the ArcFace template scaled to a `size` x `size` crop.
    pub fn umeyama_to_arc(&self, size: u32) -> Option<Matrix3<f32>> {
        self.umeyama(&ARC_FACE_DST.scale(size as f32 / 112.))
    }
}

impl std::ops::Deref for KeyPoints {
    type Target = [[f32; 2]; KEY_POINTS_LEN];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
