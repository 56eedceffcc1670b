//! Scene aggregate: object and material arenas with linear ray queries.

use crate::hittable::{HitRecord, MaterialId, ObjectId};
use crate::material::Material;
use crate::object::Object;
use pathrender_math::{Color, Interval, Ray};

/// All objects and materials of a render.
///
/// Objects refer to materials by `MaterialId`; both arenas are append-only
/// so handles stay valid until `clear`.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<Object>,
    materials: Vec<Material>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn add_object(&mut self, object: impl Into<Object>) -> ObjectId {
        self.objects.push(object.into());
        ObjectId(self.objects.len() - 1)
    }

    /// Remove every object and material. Outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.materials.clear();
    }

    /// Material behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this scene.
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects.iter().enumerate().map(|(i, o)| (ObjectId(i), o))
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Objects whose material is a light, in insertion order.
    pub fn emitters(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects()
            .filter(move |(_, o)| self.material(o.material()).is_light)
    }

    /// Base color of the material at a hit, used for flat previews.
    pub fn display_color(&self, rec: &HitRecord) -> Color {
        self.material(rec.material).color
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Closest hit over all objects.
    ///
    /// The upper bound shrinks to the closest hit so far, so each object
    /// only reports hits nearer than everything before it.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for (i, object) in self.objects.iter().enumerate() {
            if object.intersect(ray, ray_t.with_max(closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.t;
                rec.object = ObjectId(i);
            }
        }

        hit_anything
    }

    /// Whether anything opaque lies along `ray` within `ray_t`.
    ///
    /// Emitters and transmissive materials do not block shadow rays.
    pub fn occluded(&self, ray: &Ray, ray_t: Interval) -> bool {
        let mut rec = HitRecord::default();
        self.objects.iter().any(|object| {
            self.material(object.material()).occludes() && object.intersect(ray, ray_t, &mut rec)
        })
    }
}
