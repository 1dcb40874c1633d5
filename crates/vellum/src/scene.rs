//! The scene: an insertion-ordered, name-unique collection of drawables.
//!
//! All construction-input validation happens at this boundary; the
//! geometric layers below assume well-formed drawables.

use glam::Vec3;

use vellum_core::{Color, CurveBasis, Drawable, Result, VellumError};

/// The world model: every drawable the editor knows about, in insertion
/// order. Names are unique within a scene.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<Drawable>,
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A small seeded scene with one of everything 2D, handy for manual
    /// testing and demos.
    #[must_use]
    pub fn demo() -> Self {
        let mut scene = Self::new();
        let red = Color::new(1.0, 0.0, 0.0);
        let green = Color::new(0.0, 1.0, 0.0);
        let blue = Color::new(0.0, 0.0, 1.0);
        let yellow = Color::new(1.0, 1.0, 0.0);

        // Seed geometry is well-formed, so none of these can fail.
        let _ = scene.create_point("marker", Vec3::new(-25.0, 50.0, 0.0), red);
        let _ = scene.create_line(
            "diagonal",
            Vec3::new(-40.0, -32.0, 0.0),
            Vec3::new(10.0, 90.0, 0.0),
            green,
        );
        let _ = scene.create_wireframe(
            "octagon",
            vec![
                Vec3::new(-15.0, 15.0, 0.0),
                Vec3::new(0.0, 20.0, 0.0),
                Vec3::new(15.0, 15.0, 0.0),
                Vec3::new(20.0, 0.0, 0.0),
                Vec3::new(15.0, -15.0, 0.0),
                Vec3::new(0.0, -20.0, 0.0),
                Vec3::new(-15.0, -15.0, 0.0),
                Vec3::new(-20.0, 0.0, 0.0),
            ],
            blue,
            false,
        );
        let _ = scene.create_line(
            "x-axis",
            Vec3::new(-10_000.0, 0.0, 0.0),
            Vec3::new(10_000.0, 0.0, 0.0),
            Color::BLACK,
        );
        let _ = scene.create_line(
            "y-axis",
            Vec3::new(0.0, -10_000.0, 0.0),
            Vec3::new(0.0, 10_000.0, 0.0),
            Color::BLACK,
        );
        let _ = scene.create_wireframe(
            "square",
            vec![
                Vec3::new(10.0, 10.0, 0.0),
                Vec3::new(10.0, 100.0, 0.0),
                Vec3::new(100.0, 100.0, 0.0),
                Vec3::new(100.0, 10.0, 0.0),
            ],
            yellow,
            false,
        );
        scene
    }

    /// Adds a drawable, returning its index.
    ///
    /// Fails with [`VellumError::NameExists`] on a duplicate name.
    pub fn add(&mut self, drawable: Drawable) -> Result<usize> {
        if self.find(drawable.name()).is_some() {
            return Err(VellumError::NameExists(drawable.name().to_string()));
        }
        log::info!("scene: add '{}'", drawable.name());
        self.objects.push(drawable);
        Ok(self.objects.len() - 1)
    }

    /// Creates a point object.
    pub fn create_point(
        &mut self,
        name: impl Into<String>,
        position: Vec3,
        color: Color,
    ) -> Result<usize> {
        self.add(Drawable::point(name, position, color))
    }

    /// Creates a line object.
    pub fn create_line(
        &mut self,
        name: impl Into<String>,
        start: Vec3,
        end: Vec3,
        color: Color,
    ) -> Result<usize> {
        self.add(Drawable::line(name, start, end, color))
    }

    /// Creates a closed polygon object, outlined or filled.
    pub fn create_wireframe(
        &mut self,
        name: impl Into<String>,
        points: Vec<Vec3>,
        color: Color,
        filled: bool,
    ) -> Result<usize> {
        self.add(Drawable::wireframe(name, points, color, filled)?)
    }

    /// Creates a piecewise cubic Bézier curve (`4 + 2k` control points).
    pub fn create_bezier(
        &mut self,
        name: impl Into<String>,
        control: Vec<Vec3>,
        color: Color,
        steps: usize,
    ) -> Result<usize> {
        self.add(Drawable::curve(name, CurveBasis::Bezier, control, color, steps)?)
    }

    /// Creates a uniform cubic B-spline curve (at least 4 control points).
    pub fn create_bspline(
        &mut self,
        name: impl Into<String>,
        control: Vec<Vec3>,
        color: Color,
        steps: usize,
    ) -> Result<usize> {
        self.add(Drawable::curve(name, CurveBasis::BSpline, control, color, steps)?)
    }

    /// Creates a bicubic Bézier surface over a row-major `rows x cols`
    /// control net (dimensions `4 + 3k`).
    #[allow(clippy::too_many_arguments)]
    pub fn create_bezier_surface(
        &mut self,
        name: impl Into<String>,
        control: Vec<Vec3>,
        rows: usize,
        cols: usize,
        color: Color,
        steps: usize,
        filled: bool,
    ) -> Result<usize> {
        self.add(Drawable::surface(
            name,
            CurveBasis::Bezier,
            control,
            rows,
            cols,
            color,
            steps,
            filled,
        )?)
    }

    /// Creates a bicubic B-spline surface over a row-major `rows x cols`
    /// control net (at least 4x4).
    #[allow(clippy::too_many_arguments)]
    pub fn create_bspline_surface(
        &mut self,
        name: impl Into<String>,
        control: Vec<Vec3>,
        rows: usize,
        cols: usize,
        color: Color,
        steps: usize,
        filled: bool,
    ) -> Result<usize> {
        self.add(Drawable::surface(
            name,
            CurveBasis::BSpline,
            control,
            rows,
            cols,
            color,
            steps,
            filled,
        )?)
    }

    /// Removes the objects at the given indices.
    ///
    /// Fails with [`VellumError::IndexOutOfBounds`] before removing
    /// anything if any index is invalid.
    pub fn remove_objects(&mut self, indices: &[usize]) -> Result<()> {
        for &index in indices {
            if index >= self.objects.len() {
                return Err(VellumError::IndexOutOfBounds {
                    index,
                    len: self.objects.len(),
                });
            }
        }
        // Descending order so earlier removals don't shift later indices.
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();
        for index in sorted {
            let removed = self.objects.remove(index);
            log::info!("scene: remove '{}'", removed.name());
        }
        Ok(())
    }

    /// The drawable at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Drawable> {
        self.objects.get(index)
    }

    /// Mutable access to the drawable at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Drawable> {
        self.objects.get_mut(index)
    }

    /// The index of the drawable with the given name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<usize> {
        self.objects.iter().position(|d| d.name() == name)
    }

    /// Replaces the drawable at `index`.
    pub(crate) fn replace(&mut self, index: usize, drawable: Drawable) -> Result<()> {
        let len = self.objects.len();
        let slot = self
            .objects
            .get_mut(index)
            .ok_or(VellumError::IndexOutOfBounds { index, len })?;
        *slot = drawable;
        Ok(())
    }

    /// All drawables in insertion order.
    #[must_use]
    pub fn drawables(&self) -> &[Drawable] {
        &self.objects
    }

    /// Iterates the drawables in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Drawable> {
        self.objects.iter()
    }

    /// Number of drawables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when the scene holds no drawables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl<'a> IntoIterator for &'a Scene {
    type Item = &'a Drawable;
    type IntoIter = std::slice::Iter<'a, Drawable>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
