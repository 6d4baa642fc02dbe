use super::*;

/// How a ring is drawn relative to the bond it was entered through.
///
/// Hexagons (and rings of other sizes) have a single drawing. A five membered ring
/// can be drawn as a "house" entered from either side, or as a pentagon entered from
/// either upper corner; a seven membered ring can lean either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RingShape {
    Standard,
    /// Five membered, entered from the left side of a house shape.
    LeftHouse,
    /// Five membered, entered from the top left.
    TopLeft,
    /// Five membered, entered from the top right.
    TopRight,
    /// Five membered, entered from the right side of a house shape.
    RightHouse,
    /// Seven membered, entered from the left.
    LeftSeven,
    /// Seven membered, entered from the right.
    RightSeven,
}

impl RingShape {
    /// Every drawing available to a ring of the given size.
    pub fn for_size(size: usize) -> &'static [RingShape] {
        use RingShape::*;
        match size {
            5 => &[LeftHouse, TopLeft, TopRight, RightHouse],
            7 => &[LeftSeven, RightSeven],
            _ => &[Standard],
        }
    }
}

/// Bearing of the bond `distance` steps counter-clockwise from the entry bond, relative
/// to the bearing the ring was entered with.
///
/// Distance 0 is the entry bond itself and is handled by the caller, as it depends on
/// the incoming bearing rather than on the drawing.
pub fn relative_direction(
    size: usize,
    shape: RingShape,
    distance: usize,
) -> Result<Direction, NumberingError> {
    use RingShape::*;
    if size < 3 || distance == 0 || distance >= size {
        return Err(NumberingError::invariant(format!(
            "no bearing for distance {} in a ring of size {}",
            distance, size
        )));
    }

    let fixed: Option<&[i8]> = match (size, shape) {
        (3, Standard) => Some(&[-1, 1]),
        (4, Standard) => Some(&[-2, 0, 2]),
        (5, LeftHouse) => Some(&[-2, 0, 1, 3]),
        (5, RightHouse) => Some(&[-3, -1, 0, 2]),
        (5, TopLeft) => Some(&[-3, 0, 1, 3]),
        (5, TopRight) => Some(&[-3, -1, 0, 3]),
        (6, Standard) => Some(&[-3, -1, 0, 1, 3]),
        (7, LeftSeven) => Some(&[-3, -1, 0, 1, 2, 3]),
        (7, RightSeven) => Some(&[-3, -2, -1, 0, 1, 3]),
        (n, Standard) if n >= 8 => None,
        _ => {
            return Err(NumberingError::invariant(format!(
                "{:?} is not a drawing of a ring of size {}",
                shape, size
            )))
        }
    };
    if let Some(table) = fixed {
        return Ok(Direction::new(table[distance - 1]));
    }

    if !has_drawing(size) {
        return Err(NumberingError::invariant(format!(
            "unsupported ring size {}",
            size
        )));
    }

    // Large even rings: the entry's neighbours point sideways, the rest fan out across
    // the far side of the ring.
    let half = (size / 2) as i32;
    let d = distance as i32;
    let bearing = if distance == 1 {
        -3
    } else if distance == size - 1 {
        3
    } else {
        (d - half).clamp(-2, 2)
    };
    Ok(Direction::new(bearing as i8))
}

/// Rings of three to seven atoms, or an even number of atoms beyond that.
fn has_drawing(size: usize) -> bool {
    (3..=7).contains(&size) || (size >= 8 && size % 2 == 0)
}

/// The drawings worth trying for a ring entered at `entry`, with its other fusion
/// bonds at the given cyclic distances from the entry.
///
/// Drawings that put fusions on vertical (elongated) edges are dropped when another
/// drawing avoids them, and drawings producing the same bearings for every fusion are
/// collapsed into the first of them.
pub fn legal_shapes(
    size: usize,
    fused_distances: &[usize],
) -> Result<Vec<RingShape>, NumberingError> {
    if !has_drawing(size) {
        return Err(NumberingError::invariant(format!(
            "unsupported ring size {}",
            size
        )));
    }
    let shapes = RingShape::for_size(size);
    if fused_distances.is_empty() {
        return Ok(vec![shapes[0]]);
    }

    let mut scored = Vec::with_capacity(shapes.len());
    for &shape in shapes {
        let bearings = fused_distances
            .iter()
            .map(|&d| relative_direction(size, shape, d))
            .collect::<Result<Vec<_>, _>>()?;
        let vertical = bearings.iter().filter(|b| b.is_vertical()).count();
        scored.push((shape, bearings, vertical));
    }

    let fewest = scored.iter().map(|(_, _, v)| *v).min().unwrap_or(0);
    let mut seen: Vec<Vec<Direction>> = Vec::new();
    let mut legal = Vec::new();
    for (shape, bearings, vertical) in scored {
        if vertical == fewest && !seen.contains(&bearings) {
            seen.push(bearings);
            legal.push(shape);
        }
    }
    Ok(legal)
}
