use log::debug;
use once_cell::sync::OnceCell;

use super::{Shape, ShapeArena, ShapeId, ShapeKind};
use crate::{
    bounding_box::BoundingBox, intersection::Intersection, Ray, RayTracerError, Result,
};

/// An ordered collection of child shapes that share a transformation.
///
/// Children are only ever added through a [`ShapeArena`], which keeps their
/// parent ids in step. The bounding box is computed on first use and cleared
/// whenever something beneath the group changes.
#[derive(Debug, Default)]
pub struct Group {
    children: Vec<ShapeId>,
    bounds: OnceCell<BoundingBox>,
}

impl Group {
    pub fn children(&self) -> &[ShapeId] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(super) fn clear_bounds(&mut self) {
        self.bounds.take();
    }
}

impl ShapeArena {
    /// Direct children of a group; empty for anything else.
    pub fn children(&self, id: ShapeId) -> &[ShapeId] {
        self.get(id)
            .and_then(Shape::as_group)
            .map(Group::children)
            .unwrap_or_default()
    }

    /// With `recurse`, the number of non-group shapes anywhere beneath `id`;
    /// otherwise the number of direct children.
    pub fn size(&self, id: ShapeId, recurse: bool) -> usize {
        let children = self.children(id);
        if !recurse {
            return children.len();
        }
        children
            .iter()
            .map(|child| {
                if self[*child].is_group() {
                    self.size(*child, true)
                } else {
                    1
                }
            })
            .sum()
    }

    /// Creates a shape directly inside `group`.
    pub fn insert_into(&mut self, group: ShapeId, shape: Shape) -> Result<ShapeId> {
        self.group_mut(group)?;
        let child = self.shapes.insert(shape);
        self.attach(group, child);
        Ok(child)
    }

    /// Moves an existing shape into `group`, taking it out of wherever it was before.
    pub fn add_child(&mut self, group: ShapeId, child: ShapeId) -> Result<()> {
        self.group_mut(group)?;
        if !self.contains(child) {
            return Err(RayTracerError::UnknownShape(child));
        }
        if self.is_ancestor_or_self(child, group) {
            return Err(RayTracerError::CyclicGroup { group, child });
        }
        self.detach(child);
        self.attach(group, child);
        Ok(())
    }

    /// Takes `child` out of `group` and makes it a top-level shape again.
    pub fn remove_child(&mut self, group: ShapeId, child: ShapeId) -> Result<()> {
        self.group_mut(group)?;
        if self.parent(child) != Some(group) {
            return Err(RayTracerError::NotAChild { group, child });
        }
        self.detach(child);
        self.roots.push(child);
        Ok(())
    }

    /// Splits a group's children by which half of its bounding box they fit in.
    ///
    /// Children that fit in neither half stay where they are. The ones returned
    /// become top-level shapes until they are given to another group.
    pub fn partition_children(&mut self, group: ShapeId) -> Result<(Vec<ShapeId>, Vec<ShapeId>)> {
        self.group_mut(group)?;
        let (left, right) = self.plan_partition(group);
        for child in left.iter().chain(&right) {
            self.detach(*child);
            self.roots.push(*child);
        }
        Ok((left, right))
    }

    /// Wraps `shapes` in a new group added to the end of `group`'s children.
    pub fn make_subgroup(&mut self, group: ShapeId, shapes: &[ShapeId]) -> Result<ShapeId> {
        let subgroup = self.insert_into(group, Shape::group())?;
        for shape in shapes {
            self.add_child(subgroup, *shape)?;
        }
        Ok(subgroup)
    }

    /// Turns a flat group into a tree of nested groups so rays can skip whole
    /// branches at once.
    ///
    /// A group with at least `threshold` children has them partitioned into
    /// two new subgroups by [`partition_children`](Self::partition_children);
    /// then every child is divided in turn, whatever its size. The number of
    /// shapes beneath `id` never changes. Anything but a group is left alone.
    pub fn divide(&mut self, id: ShapeId, threshold: usize) -> Result<()> {
        if threshold == 0 {
            return Err(RayTracerError::InvalidDivideThreshold);
        }
        if !self.contains(id) {
            return Err(RayTracerError::UnknownShape(id));
        }
        let before = self.len();
        self.divide_group(id, threshold);
        debug!(
            "divided {:?} with threshold {}: {} new groups",
            id,
            threshold,
            self.len() - before
        );
        Ok(())
    }

    /// Divides every top-level group.
    pub fn divide_roots(&mut self, threshold: usize) -> Result<()> {
        let groups = self
            .roots
            .iter()
            .copied()
            .filter(|id| self[*id].is_group())
            .collect::<Vec<_>>();
        for group in groups {
            self.divide(group, threshold)?;
        }
        Ok(())
    }

    fn divide_group(&mut self, id: ShapeId, threshold: usize) {
        let count = self.size(id, false);
        if count == 0 {
            return;
        }
        if threshold <= count {
            let (left, right) = self.plan_partition(id);
            // a bucket holding every child would rebuild this same group forever
            let degenerate = left.len() == count || right.len() == count;
            if !degenerate {
                for bucket in [left, right] {
                    if !bucket.is_empty() {
                        self.subgroup_from_children(id, &bucket);
                    }
                }
            }
        }

        let children = self.children(id).to_vec();
        for child in children {
            self.divide_group(child, threshold);
        }
    }

    /// Like `make_subgroup`, for shapes that are already children of `group`.
    fn subgroup_from_children(&mut self, group: ShapeId, shapes: &[ShapeId]) {
        let subgroup = self.shapes.insert(Shape::group());
        for shape in shapes {
            self.detach(*shape);
            self.attach(subgroup, *shape);
        }
        self.attach(group, subgroup);
    }

    /// Which children fit entirely in the left and right halves of the group's bounds.
    fn plan_partition(&self, group: ShapeId) -> (Vec<ShapeId>, Vec<ShapeId>) {
        let bounds = self.bounds_of(group);
        if !bounds.is_finite() {
            return (vec![], vec![]);
        }
        let (left_box, right_box) = bounds.split();
        let mut left = vec![];
        let mut right = vec![];
        for child in self.children(group) {
            let child_bounds = self.parent_space_bounds_of(*child);
            if left_box.contains_box(&child_bounds) {
                left.push(*child);
            } else if right_box.contains_box(&child_bounds) {
                right.push(*child);
            }
        }
        (left, right)
    }

    pub(super) fn intersect_group(&self, group: &Group, ray: &Ray) -> Vec<Intersection> {
        if !self.group_bounds(group).intersects(ray) {
            return vec![];
        }
        let mut xs = group
            .children
            .iter()
            .flat_map(|child| self.intersect(*child, ray))
            .collect::<Vec<_>>();
        xs.sort_by(|a, b| a.t.total_cmp(&b.t));
        xs
    }

    pub(super) fn group_bounds(&self, group: &Group) -> BoundingBox {
        *group.bounds.get_or_init(|| {
            let mut bounds = BoundingBox::empty();
            for child in &group.children {
                bounds.add_box(&self.parent_space_bounds_of(*child));
            }
            bounds
        })
    }

    fn group_mut(&mut self, id: ShapeId) -> Result<&mut Group> {
        match self.shapes.get_mut(id) {
            Some(Shape {
                kind: ShapeKind::Group(group),
                ..
            }) => Ok(group),
            Some(_) => Err(RayTracerError::NotAGroup(id)),
            None => Err(RayTracerError::UnknownShape(id)),
        }
    }

    fn is_ancestor_or_self(&self, candidate: ShapeId, id: ShapeId) -> bool {
        let mut current = Some(id);
        while let Some(shape) = current {
            if shape == candidate {
                return true;
            }
            current = self.parent(shape);
        }
        false
    }

    /// Appends a parentless, rootless shape to `group`.
    fn attach(&mut self, group: ShapeId, child: ShapeId) {
        if let Some(ShapeKind::Group(g)) = self.shapes.get_mut(group).map(|s| &mut s.kind) {
            g.children.push(child);
        }
        if let Some(shape) = self.shapes.get_mut(child) {
            shape.parent = Some(group);
        }
        self.invalidate_bounds(Some(group));
    }

    /// Removes a shape from its group, or from the roots if it has no group.
    fn detach(&mut self, child: ShapeId) {
        let parent = self.shapes.get_mut(child).and_then(|shape| shape.parent.take());
        match parent {
            Some(parent) => {
                if let Some(ShapeKind::Group(g)) = self.shapes.get_mut(parent).map(|s| &mut s.kind)
                {
                    g.children.retain(|id| *id != child);
                }
                self.invalidate_bounds(Some(parent));
            }
            None => self.roots.retain(|id| *id != child),
        }
    }
}
