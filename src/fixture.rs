//!
//! 区域顶点的二进制格式
//!
//! 小端i32的顶点数量，后面跟着相同数量的小端i32的（x, y）
//!

use std::io::{Read, Write};

use crate::*;

/// 读取顶点序列
pub fn read_vertices<R: Read>(reader: &mut R) -> Result<Vec<Point>> {
    let count = read_i32(reader)?;
    if count < 0 {
        return Err(PolyPathError::InvalidFixture(format!("negative vertex count {}", count)));
    }
    let mut points = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let x = read_i32(reader)?;
        let y = read_i32(reader)?;
        points.push(Point::new(x as isize, y as isize));
    }
    Ok(points)
}

/// 写入顶点序列，坐标超出i32范围时返回错误
pub fn write_vertices<W: Write>(writer: &mut W, points: &[Point]) -> Result<()> {
    let count = i32::try_from(points.len())
        .map_err(|_| PolyPathError::InvalidFixture(format!("too many vertices {}", points.len())))?;
    writer.write_all(&count.to_le_bytes())?;
    for p in points {
        writer.write_all(&to_i32(p.x)?.to_le_bytes())?;
        writer.write_all(&to_i32(p.y)?.to_le_bytes())?;
    }
    Ok(())
}

fn read_i32<R: Read>(reader: &mut R) -> Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

fn to_i32(v: isize) -> Result<i32> {
    i32::try_from(v).map_err(|_| PolyPathError::InvalidFixture(format!("coordinate {} out of range", v)))
}

impl Region {
    /// 读取顶点创建区域，读到的顶点不自动闭合
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(Region::from_points(read_vertices(reader)?))
    }
    /// 写入区域的顶点
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_vertices(writer, self.points())
    }
}

#[cfg(test)]
mod test_fixture {
    use crate::*;
    use std::io::Cursor;

    #[test]
    fn test_layout() {
        let mut buf = Vec::new();
        write_vertices(&mut buf, &[Point::new(1, -2), Point::new(300, 4)]).unwrap();
        assert_eq!(
            buf,
            vec![2, 0, 0, 0, 1, 0, 0, 0, 0xfe, 0xff, 0xff, 0xff, 0x2c, 0x01, 0, 0, 4, 0, 0, 0]
        );
        let points = read_vertices(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(points, vec![Point::new(1, -2), Point::new(300, 4)]);
    }
    #[test]
    fn test_region() {
        let mut region = Region::from_points(vec![
            Point::new(0, 0),
            Point::new(64, 0),
            Point::new(64, 64),
            Point::new(0, 64),
        ]);
        region.close().unwrap();
        let mut buf = Vec::new();
        region.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), 4 + 5 * 8);

        let mut loaded = Region::from_reader(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(loaded.points(), region.points());
        assert!(!loaded.is_closed());
        loaded.close().unwrap();
        assert_eq!(loaded.points().len(), 5);
        assert_eq!(loaded.create_grid(16, 16).unwrap().pathable_count(), 9);
    }
    #[test]
    fn test_invalid() {
        let buf = (-1i32).to_le_bytes();
        assert!(matches!(
            read_vertices(&mut Cursor::new(&buf)),
            Err(PolyPathError::InvalidFixture(_))
        ));
        // 数据不完整
        let buf = [3, 0, 0, 0, 1, 0, 0, 0];
        assert!(matches!(read_vertices(&mut Cursor::new(&buf)), Err(PolyPathError::Io(_))));

        let mut buf = Vec::new();
        let r = write_vertices(&mut buf, &[Point::new(isize::MAX, 0)]);
        assert!(matches!(r, Err(PolyPathError::InvalidFixture(_))));
    }
}
