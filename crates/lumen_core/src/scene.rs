//! Scene container and mesh construction helpers.
//!
//! The scene owns an ordered list of primitives; a primitive's index in that
//! list is its identity. Composite shapes (planes, boxes, icosahedra,
//! triangulated spheres) are built from triangles and handed back as a
//! [`MeshRef`], a plain index set used for bulk operations such as assigning
//! one material to every face.

use lumen_math::{rotation_matrix, Color, Ray, Vec3, Vec3Ext};

use crate::light::{DEFAULT_FALLOFF_EXPONENT, DEFAULT_OPENING_ANGLE};
use crate::primitive::{HitTest, Primitive, Shape, Sphere, Triangle};
use crate::{GeometryError, GeometryResult, Light, Material};

/// Non-owning handle to a set of primitives in a [`Scene`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeshRef {
    indices: Vec<usize>,
}

impl MeshRef {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(index: usize) -> Self {
        Self {
            indices: vec![index],
        }
    }

    /// Union of several references, keeping first-seen order without duplicates.
    pub fn merge<'a>(references: impl IntoIterator<Item = &'a MeshRef>) -> Self {
        let mut indices = Vec::new();

        for reference in references {
            for &index in &reference.indices {
                if !indices.contains(&index) {
                    indices.push(index);
                }
            }
        }

        Self { indices }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of primitives referenced.
    pub fn shape_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl From<Vec<usize>> for MeshRef {
    fn from(indices: Vec<usize>) -> Self {
        Self { indices }
    }
}

/// Primitives and lights to render.
///
/// Built once, then only read while rendering.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    primitives: Vec<Primitive>,
    lights: Vec<Light>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Number of primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Remove all primitives and lights.
    pub fn clear(&mut self) {
        self.primitives.clear();
        self.lights.clear();
    }

    /// Bounds-checked primitive access.
    pub fn primitive(&self, index: usize) -> GeometryResult<&Primitive> {
        self.primitives
            .get(index)
            .ok_or(GeometryError::IndexOutOfRange {
                index,
                len: self.primitives.len(),
            })
    }

    /// Resolve a mesh reference into the primitives it names.
    pub fn mesh(&self, mesh: &MeshRef) -> GeometryResult<Vec<&Primitive>> {
        mesh.indices.iter().map(|&i| self.primitive(i)).collect()
    }

    /// Total surface area of the referenced primitives.
    pub fn surface_area(&self, mesh: &MeshRef) -> GeometryResult<f32> {
        Ok(self.mesh(mesh)?.iter().map(|p| p.surface_area()).sum())
    }

    /// Assign a copy of `material` to every referenced primitive.
    ///
    /// Nothing is changed if any index is out of range.
    pub fn set_material(&mut self, mesh: &MeshRef, material: Material) -> GeometryResult<()> {
        self.mesh(mesh)?;

        for &index in &mesh.indices {
            self.primitives[index].set_material(material);
        }
        Ok(())
    }

    /// Append a primitive and return its reference.
    pub fn add_primitive(&mut self, primitive: Primitive) -> MeshRef {
        self.primitives.push(primitive);
        MeshRef::single(self.primitives.len() - 1)
    }

    /// Append a shape with the default material.
    pub fn add_shape(&mut self, shape: impl Into<Shape>) -> MeshRef {
        self.add_primitive(Primitive::new(shape))
    }

    fn add_triangles(&mut self, triangles: impl IntoIterator<Item = Triangle>) -> MeshRef {
        let start = self.primitives.len();
        self.primitives
            .extend(triangles.into_iter().map(Primitive::new));
        MeshRef::from((start..self.primitives.len()).collect::<Vec<_>>())
    }

    pub fn add_sphere(&mut self, center: Vec3, radius: f32) -> GeometryResult<MeshRef> {
        Ok(self.add_shape(Sphere::new(center, radius)?))
    }

    /// Add a triangle whose vertices are rotated about the world origin.
    pub fn add_triangle(
        &mut self,
        a: Vec3,
        b: Vec3,
        c: Vec3,
        euler_angles: Vec3,
    ) -> GeometryResult<MeshRef> {
        let tri = rotated_triangle(a, b, c, euler_angles)?;
        Ok(self.add_triangles([tri]))
    }

    /// Add the quad ABCD as triangles (A, B, C) and (C, D, A).
    pub fn add_plane(
        &mut self,
        a: Vec3,
        b: Vec3,
        c: Vec3,
        d: Vec3,
        euler_angles: Vec3,
    ) -> GeometryResult<MeshRef> {
        let first = rotated_triangle(a, b, c, euler_angles)?;
        let second = rotated_triangle(c, d, a, euler_angles)?;
        Ok(self.add_triangles([first, second]))
    }

    /// Add a `width × height` rectangle in the XY plane centered on `position`,
    /// rotated about its center.
    pub fn add_plane_xy(
        &mut self,
        position: Vec3,
        width: f32,
        height: f32,
        euler_angles: Vec3,
    ) -> GeometryResult<MeshRef> {
        let rotation = rotation_matrix(euler_angles);
        let x = Vec3::new(width / 2.0, 0.0, 0.0).transform(&rotation);
        let y = Vec3::new(0.0, height / 2.0, 0.0).transform(&rotation);

        self.add_plane(
            position - x + y,
            position + x + y,
            position + x - y,
            position - x - y,
            Vec3::ZERO,
        )
    }

    /// Add an axis-aligned cube with edge length `size`.
    pub fn add_cube(&mut self, center: Vec3, size: f32) -> GeometryResult<MeshRef> {
        self.add_box(center, Vec3::splat(size), Vec3::ZERO)
    }

    /// Add a box (6 quads, 12 triangles) rotated about its center.
    pub fn add_box(&mut self, center: Vec3, size: Vec3, euler_angles: Vec3) -> GeometryResult<MeshRef> {
        let rotation = rotation_matrix(euler_angles);
        let half = size / 2.0;
        let corner = |x: f32, y: f32, z: f32| center + Vec3::new(x, y, z).transform(&rotation);

        let a = corner(half.x, half.y, half.z);
        let b = corner(half.x, half.y, -half.z);
        let c = corner(-half.x, half.y, -half.z);
        let d = corner(-half.x, half.y, half.z);
        let e = corner(half.x, -half.y, half.z);
        let f = corner(half.x, -half.y, -half.z);
        let g = corner(-half.x, -half.y, -half.z);
        let h = corner(-half.x, -half.y, half.z);

        let faces = [
            [a, b, c, d],
            [a, e, f, b],
            [b, f, g, c],
            [c, g, h, d],
            [d, h, e, a],
            [e, h, g, f],
        ];

        let mut triangles = Vec::with_capacity(12);
        for [p, q, r, s] in faces {
            triangles.push(Triangle::new(p, q, r)?);
            triangles.push(Triangle::new(r, s, p)?);
        }

        Ok(self.add_triangles(triangles))
    }

    /// Add a regular icosahedron (20 triangles) with circumradius `size`.
    pub fn add_icosahedron(&mut self, center: Vec3, size: f32, euler_angles: Vec3) -> GeometryResult<MeshRef> {
        const X: f32 = 0.525_731_1;
        const Z: f32 = 0.850_650_8;
        const VERTICES: [[f32; 3]; 12] = [
            [-X, 0.0, Z],
            [X, 0.0, Z],
            [-X, 0.0, -Z],
            [X, 0.0, -Z],
            [0.0, Z, X],
            [0.0, Z, -X],
            [0.0, -Z, X],
            [0.0, -Z, -X],
            [Z, X, 0.0],
            [-Z, X, 0.0],
            [Z, -X, 0.0],
            [-Z, -X, 0.0],
        ];
        const FACES: [[usize; 3]; 20] = [
            [0, 4, 1],
            [0, 9, 4],
            [9, 5, 4],
            [4, 5, 8],
            [4, 8, 1],
            [8, 10, 1],
            [8, 3, 10],
            [5, 3, 8],
            [5, 2, 3],
            [2, 7, 3],
            [7, 10, 3],
            [7, 6, 10],
            [7, 11, 6],
            [11, 0, 6],
            [0, 1, 6],
            [6, 1, 10],
            [9, 0, 11],
            [9, 11, 2],
            [9, 2, 5],
            [7, 2, 11],
        ];

        let rotation = rotation_matrix(euler_angles);
        let vertices: Vec<Vec3> = VERTICES
            .iter()
            .map(|&v| center + (Vec3::from(v) * size).transform(&rotation))
            .collect();

        let triangles = FACES
            .iter()
            .map(|&[i, j, k]| Triangle::new(vertices[i], vertices[j], vertices[k]))
            .collect::<GeometryResult<Vec<_>>>()?;

        Ok(self.add_triangles(triangles))
    }

    /// Split triangle `index` into four at its edge midpoints.
    ///
    /// ```text
    ///      A
    ///     / \
    ///   AB---AC
    ///   / \ / \
    ///  B---BC--C
    /// ```
    ///
    /// The corner child at A takes over slot `index`; the other three are
    /// appended. All four inherit the parent's material.
    pub fn subdivide(&mut self, index: usize) -> GeometryResult<MeshRef> {
        let parent = *self.primitive(index)?;
        let tri = parent
            .shape
            .as_triangle()
            .ok_or(GeometryError::NotATriangle(index))?;

        let [a, b, c] = tri.vertices();
        let m_ab = (a + b) * 0.5;
        let m_ac = (a + c) * 0.5;
        let m_bc = (b + c) * 0.5;

        let corner = Triangle::new(a, m_ab, m_ac)?;
        let others = [
            Triangle::new(m_ab, b, m_bc)?,
            Triangle::new(m_ab, m_bc, m_ac)?,
            Triangle::new(m_ac, m_bc, c)?,
        ];

        self.primitives[index].shape = corner.into();

        let mut indices = vec![index];
        for child in others {
            indices.push(self.primitives.len());
            self.primitives
                .push(Primitive::new(child).with_material(parent.material));
        }

        Ok(MeshRef::from(indices))
    }

    /// Subdivide every triangle of `mesh` once.
    pub fn subdivide_mesh(&mut self, mesh: &MeshRef) -> GeometryResult<MeshRef> {
        let children = mesh
            .indices
            .iter()
            .map(|&index| self.subdivide(index))
            .collect::<GeometryResult<Vec<_>>>()?;

        Ok(MeshRef::merge(&children))
    }

    /// Approximate a sphere with `20·4^levels` triangles.
    ///
    /// Builds an icosahedron, subdivides it `levels` times, then projects every
    /// vertex onto the sphere.
    pub fn add_triangulated_sphere(
        &mut self,
        center: Vec3,
        radius: f32,
        levels: u32,
    ) -> GeometryResult<MeshRef> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(GeometryError::InvalidRadius(radius));
        }

        let mut sphere = self.add_icosahedron(center, radius, Vec3::ZERO)?;
        for _ in 0..levels {
            sphere = self.subdivide_mesh(&sphere)?;
        }

        let project = |v: Vec3| -> GeometryResult<Vec3> { Ok((v - center).unit()? * radius + center) };

        for &index in &sphere.indices {
            let tri = self
                .primitive(index)?
                .shape
                .as_triangle()
                .copied()
                .ok_or(GeometryError::NotATriangle(index))?;
            let [a, b, c] = tri.vertices();
            let projected = Triangle::new(project(a)?, project(b)?, project(c)?)?;
            self.primitives[index].shape = projected.into();
        }

        log::debug!(
            "Triangulated sphere at {} (r={}, {} levels): {} triangles",
            center,
            radius,
            levels,
            sphere.shape_count()
        );

        Ok(sphere)
    }

    /// Add a light and return its index.
    pub fn add_light(&mut self, light: Light) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    /// Add a spot light with the default cone (20°) and falloff exponent (3).
    pub fn add_spot_light(
        &mut self,
        position: Vec3,
        direction: Vec3,
        color: Color,
        intensity: f32,
    ) -> GeometryResult<usize> {
        let light = Light::spot(
            position,
            direction,
            color,
            intensity,
            DEFAULT_OPENING_ANGLE,
            DEFAULT_FALLOFF_EXPONENT,
        )?;
        Ok(self.add_light(light))
    }

    pub fn add_parallel_light(&mut self, direction: Vec3, color: Color, intensity: f32) -> GeometryResult<usize> {
        Ok(self.add_light(Light::parallel(direction, color, intensity)?))
    }

    pub fn add_global_light(&mut self, color: Color, intensity: f32) -> usize {
        self.add_light(Light::global(color, intensity))
    }

    /// Closest primitive hit by `ray`: `(index, hit)`.
    ///
    /// Linear scan in insertion order; a later primitive only wins when it is
    /// strictly closer, so ties keep the first.
    pub fn nearest_hit(&self, ray: &Ray) -> Option<(usize, HitTest)> {
        let mut best: Option<(usize, HitTest)> = None;
        let mut best_distance = f32::INFINITY;

        for (index, primitive) in self.primitives.iter().enumerate() {
            let hit = primitive.intersect(ray);
            if hit.is_hit() && hit.distance < best_distance {
                best_distance = hit.distance;
                best = Some((index, hit));
            }
        }

        best
    }
}

fn rotated_triangle(a: Vec3, b: Vec3, c: Vec3, euler_angles: Vec3) -> GeometryResult<Triangle> {
    let rotation = rotation_matrix(euler_angles);
    Triangle::new(
        a.transform(&rotation),
        b.transform(&rotation),
        c.transform(&rotation),
    )
}
