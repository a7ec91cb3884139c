//! Ray casting against point spheres

use archspace_core::{PointerCoords, Point3f, Vector3f};

/// A half-line with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3f,
    pub direction: Vector3f,
}

impl Ray {
    /// `None` if `direction` has no length
    pub fn new(origin: Point3f, direction: Vector3f) -> Option<Self> {
        let norm = direction.norm();
        if !norm.is_finite() || norm <= f32::EPSILON {
            return None;
        }
        Some(Self {
            origin,
            direction: direction / norm,
        })
    }

    pub fn at(&self, t: f32) -> Point3f {
        self.origin + self.direction * t
    }
}

/// Distance along `ray` to the first hit on a sphere, if any
///
/// A ray starting inside the sphere hits its far side.
pub fn ray_sphere(ray: &Ray, center: &Point3f, radius: f32) -> Option<f32> {
    let oc = ray.origin - *center;
    let b = oc.dot(&ray.direction);
    let c = oc.norm_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let near = -b - root;
    let far = -b + root;
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

/// The candidate whose sphere the ray hits first
pub fn pick_nearest<'a, K, I>(ray: &Ray, candidates: I) -> Option<&'a K>
where
    K: 'a,
    I: IntoIterator<Item = (&'a K, Point3f, f32)>,
{
    candidates
        .into_iter()
        .filter_map(|(key, center, radius)| ray_sphere(ray, &center, radius).map(|t| (key, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key)
}

/// Size of the drawing surface in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// Zero extents are raised to one pixel
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Pixel position to normalized device coordinates, y pointing up
    pub fn to_ndc(&self, pointer: PointerCoords) -> (f32, f32) {
        (
            pointer.x / self.width as f32 * 2.0 - 1.0,
            -(pointer.y / self.height as f32 * 2.0 - 1.0),
        )
    }

    pub fn to_pixels(&self, x: f32, y: f32) -> PointerCoords {
        PointerCoords::new(
            (x + 1.0) * 0.5 * self.width as f32,
            (1.0 - y) * 0.5 * self.height as f32,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}
